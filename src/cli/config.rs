use clap::{Parser, Subcommand};

/// Arguments for config command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show all settings:\n    ciqw config\n\n\
                  Show the target device:\n    ciqw config get device\n\n\
                  Change the target device:\n    ciqw config set device venu2\n\n\
                  Extra compiler flags:\n    ciqw config set flags \"--warn --typecheck 2\"\n\n\
                  Print the configuration file path:\n    ciqw config path")]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigSubcommand>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show all settings
    Show,

    /// Print one setting
    Get {
        /// Setting name (sdks, sdkmanager, key, device, flags, version)
        key: String,
    },

    /// Change one setting
    Set {
        /// Setting name (sdks, sdkmanager, key, device, flags, version)
        key: String,
        /// New value; an empty version clears it
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print the configuration file path
    Path,
}
