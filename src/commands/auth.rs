//! Login and install-assets commands

use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;

use crate::assets::{AssetInstaller, HttpAssetApi};
use crate::auth::{SsoClient, VendorConfig};
use crate::cli::LoginArgs;
use crate::environment::Environment;
use crate::error::{CiqwError, Result};

/// Run login command
pub fn login(env: &Environment, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(username) => username,
        None => Text::new("Username:").prompt()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?,
    };

    let token = SsoClient::new()?.login(&username, &password)?;

    let mut vendor = VendorConfig::load(&env.garmin_root())?;
    vendor.set_tokens(&token);
    vendor.save()?;
    info!("Stored access token in '{}'.", vendor.path().display());
    Ok(())
}

/// Run install-assets command
pub fn install_assets(env: &Environment) -> Result<()> {
    let garmin_root = env.garmin_root();
    let vendor = VendorConfig::load(&garmin_root)?;
    let token = vendor.access_token().ok_or(CiqwError::NotLoggedIn)?;

    let api = HttpAssetApi::new(token)?;
    let installer = AssetInstaller::new(&api, &garmin_root);

    let fonts = installer.install_fonts()?;
    info!("Installed {} fonts in '{}'.", fonts, installer.fonts_dir().display());
    let devices = installer.install_devices()?;
    info!(
        "Installed {} devices in '{}'.",
        devices,
        installer.devices_dir().display()
    );
    Ok(())
}
