//! CLI definitions using clap derive API
//!
//! Argument types live in one submodule per command family:
//! - config: configuration file commands
//! - sdk: SDK installation
//! - project: build, run and key commands
//! - auth: vendor account login
//! - docs: SDK documentation and samples
//! - completions: shell completions

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::environment::{BASE_URL_ENV, CONFIG_ENV};

pub mod auth;
pub mod completions;
pub mod config;
pub mod docs;
pub mod project;
pub mod sdk;

pub use auth::LoginArgs;
pub use completions::CompletionsArgs;
pub use config::{ConfigArgs, ConfigSubcommand};
pub use docs::SamplesArgs;
pub use project::{GenkeyArgs, ProjectArgs, RunArgs};
pub use sdk::InstallSdkArgs;

/// ciqw - Connect IQ SDK wrapper
///
/// Installs the Connect IQ SDK and drives its tools from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "ciqw",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Connect IQ SDK wrapper",
    long_about = "ciqw downloads and installs the Connect IQ SDK, builds, runs and packages \
                  Connect IQ applications, and installs the fonts and device definitions \
                  the simulator needs.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  ciqw install-sdk              \x1b[90m# Install the latest stable SDK\x1b[0m\n   \
                  ciqw install-sdk 4.2.4        \x1b[90m# Install a specific SDK version\x1b[0m\n   \
                  ciqw build ./my-app           \x1b[90m# Build for the configured device\x1b[0m\n   \
                  ciqw run                      \x1b[90m# Build if needed and run in the simulator\x1b[0m\n   \
                  ciqw auto                     \x1b[90m# Rebuild and rerun on every change\x1b[0m\n   \
                  ciqw config set device venu2  \x1b[90m# Change the target device\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/ciqw/config.ini)
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Download service base URL, or a local mirror directory
    #[arg(long, global = true, env = BASE_URL_ENV, value_name = "URL")]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the default configuration file
    Init,

    /// Show or change configuration
    Config(ConfigArgs),

    /// List SDK versions available for this platform
    ListSdks,

    /// Install an SDK version (latest stable by default)
    InstallSdk(InstallSdkArgs),

    /// Install if needed and start the graphical SDK manager
    SdkManager,

    /// Build a project for the configured device
    Build(ProjectArgs),

    /// Build a store package of a project
    Release(ProjectArgs),

    /// Run a project in the simulator, building it when needed
    Run(RunArgs),

    /// Rebuild and rerun a project whenever its sources change
    Auto(ProjectArgs),

    /// Start the simulator
    Sim,

    /// Generate the signing key
    Genkey(GenkeyArgs),

    /// Log in to the vendor account
    Login(LoginArgs),

    /// Install fonts and device definitions (requires login)
    InstallAssets,

    /// Open the SDK documentation
    Doc,

    /// Open the SDK samples directory
    Samples(SamplesArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
