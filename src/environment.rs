//! Process environment, read once at startup
//!
//! Everything ciqw learns from environment variables and the host (home
//! directory, config file location, download base URL, OS) is captured in an
//! [`Environment`] value that is passed down to every operation.

use std::path::{Path, PathBuf};

use crate::error::{CiqwError, Result};
use crate::platform::{self, Platform};

/// Environment variable overriding the configuration file path
pub const CONFIG_ENV: &str = "CIQW_INI";

/// Environment variable overriding the download base URL
pub const BASE_URL_ENV: &str = "CIQW_BASE_URL";

/// Vendor download service
pub const DEFAULT_BASE_URL: &str = "https://developer.garmin.com/downloads/connect-iq/";

/// Directory name under the user's config directory
const CONFIG_DIR: &str = "ciqw";

/// Configuration file name
const CONFIG_FILE: &str = "config.ini";

/// Immutable snapshot of the process environment
#[derive(Debug, Clone)]
pub struct Environment {
    /// User home directory
    pub home: PathBuf,
    /// Path of the persisted configuration file
    pub config_path: PathBuf,
    /// Base URL (or mirror location) of the download service, always ending in `/`
    pub base_url: String,
    /// Host OS identifier
    pub os: String,
}

impl Environment {
    /// Capture the environment of the running process
    ///
    /// `config_path` and `base_url` are the values of the corresponding CLI
    /// options, which clap already falls back to [`CONFIG_ENV`] and
    /// [`BASE_URL_ENV`] for.
    pub fn capture(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| CiqwError::IoError {
            message: "Could not determine home directory".to_string(),
        })?;

        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };

        Ok(Self::new(
            home,
            config_path,
            base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            std::env::consts::OS,
        ))
    }

    /// Build an environment from explicit values
    pub fn new(home: PathBuf, config_path: PathBuf, base_url: &str, os: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Self {
            home,
            config_path,
            base_url,
            os: os.to_string(),
        }
    }

    /// Platform profile of the host, or `PlatformUnsupported`
    pub fn platform(&self) -> Result<Platform> {
        platform::detect(&self.os)
    }

    /// Platform profile used for default paths
    ///
    /// Falls back to the Linux layout on unsupported hosts so that
    /// configuration commands keep working there.
    pub fn layout(&self) -> Platform {
        self.platform().unwrap_or(Platform::Linux)
    }

    /// Root of the vendor's per-user data directory
    pub fn garmin_root(&self) -> PathBuf {
        self.layout().garmin_root(&self.home)
    }

    /// Directory holding the configuration file
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Default configuration file path: `<config dir>/ciqw/config.ini`
fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| CiqwError::IoError {
        message: "Could not determine configuration directory".to_string(),
    })?;

    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let env = Environment::new(
            PathBuf::from("/home/dev"),
            PathBuf::from("/home/dev/.config/ciqw/config.ini"),
            "https://example.com/downloads",
            "linux",
        );
        assert_eq!(env.base_url, "https://example.com/downloads/");
    }

    #[test]
    fn test_config_dir() {
        let env = Environment::new(
            PathBuf::from("/home/dev"),
            PathBuf::from("/home/dev/.config/ciqw/config.ini"),
            DEFAULT_BASE_URL,
            "linux",
        );
        assert_eq!(env.config_dir(), Path::new("/home/dev/.config/ciqw"));
    }

    #[test]
    fn test_unsupported_host_uses_linux_layout() {
        let env = Environment::new(
            PathBuf::from("/home/dev"),
            PathBuf::from("/tmp/config.ini"),
            DEFAULT_BASE_URL,
            "freebsd",
        );
        assert!(env.platform().is_err());
        assert_eq!(env.layout(), Platform::Linux);
        assert_eq!(
            env.garmin_root(),
            PathBuf::from("/home/dev/.Garmin/ConnectIQ")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with("ciqw/config.ini"));
    }
}
