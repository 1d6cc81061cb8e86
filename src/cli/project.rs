use clap::Parser;
use std::path::PathBuf;

/// Arguments for commands working on a project
#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Project directory (defaults to current directory)
    pub path: Option<PathBuf>,
}

/// Arguments for run command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run the project in the current directory:\n    ciqw run\n\n\
                  Rebuild before running:\n    ciqw run --rebuild\n\n\
                  Run another project:\n    ciqw run ../my-watchface")]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Build even if an output file exists
    #[arg(long)]
    pub rebuild: bool,
}

/// Arguments for genkey command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate the configured key if missing:\n    ciqw genkey\n\n\
                  Generate a key at a given path:\n    ciqw genkey ./developer_key.der\n\n\
                  Replace an existing key:\n    ciqw genkey --force")]
pub struct GenkeyArgs {
    /// Key file (defaults to the configured key)
    pub path: Option<PathBuf>,

    /// Overwrite an existing key
    #[arg(long)]
    pub force: bool,
}
