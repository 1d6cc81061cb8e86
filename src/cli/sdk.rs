use clap::Parser;

/// Arguments for install-sdk command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install the latest stable SDK:\n    ciqw install-sdk\n\n\
                  Install a specific version:\n    ciqw install-sdk 4.2.4\n\n\
                  Install from a local mirror:\n    ciqw install-sdk --base-url file:///srv/connect-iq/")]
pub struct InstallSdkArgs {
    /// SDK version, as shown by list-sdks
    pub version: Option<String>,
}
