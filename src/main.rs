//! ciqw - Connect IQ SDK wrapper
//!
//! A command line tool that installs the Connect IQ SDK, builds and runs
//! Connect IQ applications in the simulator, and manages the signing key,
//! vendor login, fonts and device definitions around them.

use clap::Parser;

mod assets;
mod auth;
mod cli;
mod commands;
mod common;
mod config;
mod environment;
mod error;
mod keys;
mod logging;
mod platform;
mod progress;
mod project;
mod remote;
mod sdk;
mod toolchain;
mod watch;

use cli::{Cli, Commands};
use config::ConfigStore;
use environment::Environment;
use error::Result;

fn dispatch(env: Environment, command: Commands) -> Result<()> {
    match command {
        Commands::Init => commands::config::init(&env),
        Commands::Config(args) => commands::config::run(&env, args),
        Commands::ListSdks => commands::sdk::list(&env),
        Commands::InstallSdk(args) => commands::sdk::install(&env, args),
        Commands::SdkManager => commands::sdk::manager(&env),
        Commands::Build(args) => commands::project::build(&env, args),
        Commands::Release(args) => commands::project::release(&env, args),
        Commands::Run(args) => commands::project::run(&env, args),
        Commands::Auto(args) => commands::project::auto(&env, args),
        Commands::Sim => commands::project::sim(&env),
        Commands::Genkey(args) => commands::keys::run(&env, args),
        Commands::Login(args) => commands::auth::login(&env, args),
        Commands::InstallAssets => commands::auth::install_assets(&env),
        Commands::Doc => commands::docs::doc(&env),
        Commands::Samples(args) => commands::docs::samples(&env, args),
        Commands::Version => commands::version::run(&env),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn run(cli: Cli) -> Result<()> {
    let env = Environment::capture(cli.config, cli.base_url)?;

    // A broken config file is reported by the command itself
    let configured = ConfigStore::new(&env).logging_level().ok().flatten();
    logging::init(cli.verbose, configured)?;

    dispatch(env, cli.command)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
