//! Command helper utilities

use std::path::PathBuf;

use crate::config::ConfigStore;
use crate::environment::Environment;
use crate::error::{CiqwError, Result};
use crate::platform::Platform;
use crate::remote::{self, Remote};
use crate::sdk::{Hdiutil, SdkLocator};

/// Resolve project path from optional argument
///
/// If a project path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_project_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| CiqwError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

/// Everything an SDK-facing command needs: host platform, configuration
/// file and download service
pub struct Session {
    pub platform: Platform,
    pub store: ConfigStore,
    remote: Box<dyn Remote>,
    mounter: Hdiutil,
}

impl Session {
    /// Open a session, failing early on unsupported hosts
    pub fn open(env: &Environment) -> Result<Self> {
        let platform = env.platform()?;
        let remote = remote::for_base_url(&env.base_url).map_err(|e| CiqwError::DownloadFailed {
            url: e.url,
            reason: e.reason,
        })?;
        let store = ConfigStore::new(env);

        Ok(Self {
            platform,
            store,
            remote,
            mounter: Hdiutil,
        })
    }

    pub fn remote(&self) -> &dyn Remote {
        self.remote.as_ref()
    }

    pub fn mounter(&self) -> &Hdiutil {
        &self.mounter
    }

    pub fn locator(&self) -> SdkLocator<'_> {
        SdkLocator::new(self.remote(), &self.mounter, &self.store, self.platform)
    }
}
