//! SDK commands: list-sdks, install-sdk, sdk-manager

use console::Style;
use tracing::info;

use crate::cli::InstallSdkArgs;
use crate::environment::Environment;
use crate::error::Result;
use crate::sdk::{SdkCatalogEntry, SdkManagerInstaller};
use crate::toolchain;

use super::helpers::Session;

/// Run list-sdks command
pub fn list(env: &Environment) -> Result<()> {
    let session = Session::open(env)?;
    let entries = session.locator().resolver().list_available()?;

    if entries.is_empty() {
        println!("No SDK available for {}.", session.platform);
        return Ok(());
    }

    let installed = session.store.load().ok().and_then(|s| s.version);
    for entry in &entries {
        print_entry(entry, installed.as_deref() == Some(entry.version.as_str()));
    }
    Ok(())
}

fn print_entry(entry: &SdkCatalogEntry, current: bool) {
    let version = if current {
        Style::new().bold().green().apply_to(&entry.version)
    } else {
        Style::new().bold().apply_to(&entry.version)
    };
    println!(
        "- {}: '{}' (release: {})",
        version, entry.title, entry.release_date
    );
}

/// Run install-sdk command
pub fn install(env: &Environment, args: InstallSdkArgs) -> Result<()> {
    let session = Session::open(env)?;
    let mut settings = session.store.load_or_init()?;

    let bin = session
        .locator()
        .install(args.version.as_deref(), &mut settings)?;
    info!("SDK tools available in '{}'.", bin.display());
    Ok(())
}

/// Run sdk-manager command
pub fn manager(env: &Environment) -> Result<()> {
    let session = Session::open(env)?;
    let settings = session.store.load_or_init()?;

    let installer = SdkManagerInstaller::new(session.remote(), session.mounter(), session.platform);
    let binary = installer.ensure_installed(&settings.sdkmanager)?;
    toolchain::run_tool(&binary, &[], Some(settings.sdkmanager.as_path()), &[])
}
