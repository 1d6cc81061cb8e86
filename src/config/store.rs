//! Loading and saving the configuration file

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::{debug, info};

use crate::common::fs::write_atomic;
use crate::environment::Environment;
use crate::error::{CiqwError, Result};

use super::settings::{KEYS, Settings};

/// Section holding the settings
const SECTION: &str = "ciqw";

/// Optional section holding the log filter
const LOGGING_SECTION: &str = "logging";

/// Handle on the configuration file of one environment
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    defaults: Settings,
}

impl ConfigStore {
    /// Store for the configuration file named by the environment
    pub fn new(env: &Environment) -> Self {
        Self {
            path: env.config_path.clone(),
            defaults: Settings::defaults(env),
        }
    }

    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the settings, failing with `ConfigNotFound` when there is no file
    pub fn load(&self) -> Result<Settings> {
        if !self.exists() {
            return Err(CiqwError::ConfigNotFound {
                path: self.path.display().to_string(),
            });
        }

        let ini = self.read_ini()?;
        let section = ini
            .section(Some(SECTION))
            .ok_or_else(|| CiqwError::ConfigParseFailed {
                path: self.path.display().to_string(),
                reason: format!("missing [{SECTION}] section"),
            })?;

        let mut settings = self.defaults.clone();
        for (key, value) in section.iter() {
            if KEYS.contains(&key) {
                settings.set(key, value)?;
            } else {
                settings.extra.push((key.to_string(), value.to_string()));
            }
        }

        debug!("Loaded configuration from {}", self.path.display());
        Ok(settings)
    }

    /// Load the settings, creating the file with defaults on first use
    pub fn load_or_init(&self) -> Result<Settings> {
        if self.exists() {
            self.load()
        } else {
            self.init()
        }
    }

    /// Create the configuration file with default settings
    pub fn init(&self) -> Result<Settings> {
        if self.exists() {
            return Err(CiqwError::ConfigAlreadyExists {
                path: self.path.display().to_string(),
            });
        }

        let settings = self.defaults.clone();
        self.save(&settings)?;
        info!("Created default config file: '{}'.", self.path.display());
        Ok(settings)
    }

    /// Write the settings back, keeping every other section of the file
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut ini = if self.exists() {
            self.read_ini()?
        } else {
            Ini::new()
        };

        ini.delete(Some(SECTION));
        for (key, value) in settings.entries() {
            ini.set_to(Some(SECTION), key, value);
        }

        let mut buffer = Vec::new();
        ini.write_to(&mut buffer)
            .map_err(|e| self.write_failed(e))?;
        write_atomic(&self.path, &buffer).map_err(|e| self.write_failed(e))?;

        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }

    /// Record the installed SDK version if it differs from the stored one
    ///
    /// Returns whether the file was rewritten.
    pub fn record_version(&self, settings: &mut Settings, version: &str) -> Result<bool> {
        if settings.version.as_deref() == Some(version) {
            return Ok(false);
        }

        info!("Updating version configuration with '{}'.", version);
        settings.version = Some(version.to_string());
        self.save(settings)?;
        Ok(true)
    }

    /// Log filter directive from the optional `[logging]` section
    ///
    /// A missing file, section or key is the normal case and yields `None`.
    pub fn logging_level(&self) -> Result<Option<String>> {
        if !self.exists() {
            return Ok(None);
        }

        let ini = self.read_ini()?;
        Ok(ini
            .section(Some(LOGGING_SECTION))
            .and_then(|section| section.get("level"))
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty()))
    }

    fn read_ini(&self) -> Result<Ini> {
        Ini::load_from_file(&self.path).map_err(|e| CiqwError::ConfigParseFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_failed(&self, err: std::io::Error) -> CiqwError {
        CiqwError::ConfigWriteFailed {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
