//! Init and config commands

use console::Style;

use crate::cli::{ConfigArgs, ConfigSubcommand};
use crate::config::ConfigStore;
use crate::environment::Environment;
use crate::error::Result;

/// Create the default configuration file
pub fn init(env: &Environment) -> Result<()> {
    ConfigStore::new(env).init()?;
    Ok(())
}

/// Run config command
pub fn run(env: &Environment, args: ConfigArgs) -> Result<()> {
    let store = ConfigStore::new(env);

    match args.command.unwrap_or(ConfigSubcommand::Show) {
        ConfigSubcommand::Show => {
            let settings = store.load_or_init()?;
            println!(
                "{} {}",
                Style::new().bold().apply_to("Config file:"),
                store.path().display()
            );
            for (key, value) in settings.entries() {
                println!("  {} = {}", Style::new().cyan().apply_to(key), value);
            }
            if settings.version.is_none() {
                println!(
                    "  {} = {}",
                    Style::new().cyan().apply_to("version"),
                    Style::new().dim().apply_to("(not installed)")
                );
            }
        }
        ConfigSubcommand::Get { key } => {
            let settings = store.load()?;
            if let Some(value) = settings.get(&key)? {
                println!("{value}");
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let mut settings = store.load_or_init()?;
            settings.set(&key, &value)?;
            store.save(&settings)?;
        }
        ConfigSubcommand::Path => println!("{}", store.path().display()),
    }

    Ok(())
}
