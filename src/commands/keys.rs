//! Genkey command

use crate::cli::GenkeyArgs;
use crate::config::ConfigStore;
use crate::environment::Environment;
use crate::error::Result;
use crate::keys;

/// Run genkey command
pub fn run(env: &Environment, args: GenkeyArgs) -> Result<()> {
    let key = match args.path {
        Some(path) => path,
        None => ConfigStore::new(env).load_or_init()?.key,
    };

    if keys::generate(&key, args.force)? {
        println!("{}", key.display());
    }
    Ok(())
}
