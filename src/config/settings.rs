//! The `[ciqw]` section as a typed value

use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::{CiqwError, Result};

/// Known keys of the `[ciqw]` section, in file order
pub const KEYS: [&str; 6] = ["sdks", "sdkmanager", "key", "device", "flags", "version"];

/// Default target device
const DEFAULT_DEVICE: &str = "fenix6";

/// Default extra compiler flags
const DEFAULT_FLAGS: &str = "--warn";

/// Default signing key file name, next to the config file
const KEY_FILE: &str = "key.der";

/// User settings recorded in the configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding SDK archives and extracted SDKs
    pub sdks: PathBuf,
    /// Directory holding the SDK manager
    pub sdkmanager: PathBuf,
    /// DER-encoded private signing key
    pub key: PathBuf,
    /// Device id passed to the compiler and runner
    pub device: String,
    /// Extra compiler flags, split with shell rules
    pub flags: String,
    /// Currently installed SDK version
    pub version: Option<String>,
    /// Unknown keys of the section, preserved on save
    pub extra: Vec<(String, String)>,
}

impl Settings {
    /// Default settings for an environment
    pub fn defaults(env: &Environment) -> Self {
        let garmin = env.garmin_root();
        Self {
            sdks: garmin.join("Sdks"),
            sdkmanager: garmin.join("SdkManager"),
            key: env.config_dir().join(KEY_FILE),
            device: DEFAULT_DEVICE.to_string(),
            flags: DEFAULT_FLAGS.to_string(),
            version: None,
            extra: Vec::new(),
        }
    }

    /// Value of a known key, `None` when the key is unset
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "sdks" => Some(self.sdks.display().to_string()),
            "sdkmanager" => Some(self.sdkmanager.display().to_string()),
            "key" => Some(self.key.display().to_string()),
            "device" => Some(self.device.clone()),
            "flags" => Some(self.flags.clone()),
            "version" => self.version.clone(),
            other => {
                return Err(CiqwError::UnknownConfigKey {
                    key: other.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Set a known key; an empty `version` clears it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "sdks" => self.sdks = PathBuf::from(value),
            "sdkmanager" => self.sdkmanager = PathBuf::from(value),
            "key" => self.key = PathBuf::from(value),
            "device" => self.device = value.to_string(),
            "flags" => self.flags = value.to_string(),
            "version" => {
                self.version = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.trim().to_string())
                }
            }
            other => {
                return Err(CiqwError::UnknownConfigKey {
                    key: other.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Known keys that have a value, in file order, followed by unknown keys
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = KEYS
            .iter()
            .filter_map(|key| {
                self.get(key)
                    .ok()
                    .flatten()
                    .map(|value| (key.to_string(), value))
            })
            .collect();
        entries.extend(self.extra.iter().cloned());
        entries
    }

    /// Extra compiler flags as separate arguments
    pub fn flag_args(&self) -> Result<Vec<String>> {
        shell_words::split(&self.flags).map_err(|e| CiqwError::ConfigParseFailed {
            path: "flags".to_string(),
            reason: e.to_string(),
        })
    }
}
