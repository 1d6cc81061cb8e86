//! The SDK manager's own configuration file
//!
//! A sectionless `key=value` file in the vendor data directory. Only the
//! token keys are touched; every other entry is written back unchanged.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::common::fs::write_atomic;
use crate::error::{CiqwError, Result};

use super::OAuthToken;

/// File name under the vendor data directory
pub const FILE_NAME: &str = "sdkmanager-config.ini";

pub const ACCESS_TOKEN_KEY: &str = "Garmin.ConnectIQ.SdkManager.accessToken";
pub const REFRESH_TOKEN_KEY: &str = "Garmin.ConnectIQ.SdkManager.refreshToken";

/// Loaded vendor configuration
pub struct VendorConfig {
    path: PathBuf,
    ini: Ini,
}

impl VendorConfig {
    /// Load the file under `garmin_root`; a missing file is empty
    pub fn load(garmin_root: &Path) -> Result<Self> {
        let path = garmin_root.join(FILE_NAME);
        let ini = if path.is_file() {
            Ini::load_from_file(&path).map_err(|e| CiqwError::ConfigParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            Ini::new()
        };
        Ok(Self { path, ini })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.ini.general_section().get(key)
    }

    /// Stored access token, if any
    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_KEY)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Replace the stored tokens
    pub fn set_tokens(&mut self, token: &OAuthToken) {
        self.ini.set_to(
            None::<String>,
            ACCESS_TOKEN_KEY.to_string(),
            token.access_token.clone(),
        );
        self.ini.set_to(
            None::<String>,
            REFRESH_TOKEN_KEY.to_string(),
            token.refresh_token.clone(),
        );
    }

    /// Write the file back atomically
    pub fn save(&self) -> Result<()> {
        let failed = |reason: String| CiqwError::ConfigWriteFailed {
            path: self.path.display().to_string(),
            reason,
        };

        let mut buffer = Vec::new();
        self.ini
            .write_to(&mut buffer)
            .map_err(|e| failed(e.to_string()))?;
        write_atomic(&self.path, &buffer).map_err(|e| failed(e.to_string()))
    }
}
