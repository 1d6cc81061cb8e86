//! The vendor's graphical SDK manager
//!
//! The manager is described by a small release document next to its
//! archives. Archives are cached under the configured `sdkmanager`
//! directory with the release version in their name, so a new release
//! downloads a fresh archive instead of reusing a stale one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::common::fs::mark_executable;
use crate::error::{CiqwError, Result};
use crate::platform::Platform;
use crate::remote::Remote;

use super::archive::{self, ArchiveFormat, Mounter};

/// Release document, relative to the service base
pub const RELEASE_PATH: &str = "sdk-manager/sdk-manager.json";

/// Directory of manager archives, relative to the service base
const ARCHIVES_DIR: &str = "sdk-manager/";

/// Volume under which the manager disk image appears when attached
pub const MANAGER_VOLUME: &str = "/Volumes/Connect IQ SDK Manager";

/// Application bundle copied out of the manager disk image
const MANAGER_APP: &str = "SdkManager.app";

/// Current SDK manager release
#[derive(Debug, Clone, Deserialize)]
pub struct ManagerRelease {
    pub version: String,
    #[serde(flatten)]
    packages: HashMap<String, serde_json::Value>,
}

impl ManagerRelease {
    /// Archive name for `platform`, if the release ships one
    pub fn package(&self, platform: Platform) -> Option<&str> {
        self.packages
            .get(platform.catalog_key())
            .and_then(|value| value.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Local cache name: `<stem>-<version>.<ext>`
    pub fn cached_name(&self, package: &str) -> String {
        match package.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}-{}.{ext}", self.version),
            None => format!("{package}-{}", self.version),
        }
    }
}

/// Installs the SDK manager into a directory
pub struct SdkManagerInstaller<'a> {
    remote: &'a dyn Remote,
    mounter: &'a dyn Mounter,
    platform: Platform,
}

impl<'a> SdkManagerInstaller<'a> {
    pub fn new(remote: &'a dyn Remote, mounter: &'a dyn Mounter, platform: Platform) -> Self {
        Self {
            remote,
            mounter,
            platform,
        }
    }

    /// Path of the manager executable inside `root`
    pub fn binary(&self, root: &Path) -> PathBuf {
        root.join(self.platform.sdkmanager_subpath())
    }

    /// Make sure the manager is installed in `root`; returns its executable
    ///
    /// An existing executable is used as is, without contacting the service.
    pub fn ensure_installed(&self, root: &Path) -> Result<PathBuf> {
        let binary = self.binary(root);
        if binary.exists() {
            debug!("SDK manager found at {}", binary.display());
            return Ok(binary);
        }

        let release = self.fetch_release()?;
        let package = release
            .package(self.platform)
            .ok_or_else(|| CiqwError::PlatformUnsupported {
                os: self.platform.to_string(),
            })?
            .to_string();
        let format = ArchiveFormat::from_package(&package)?;

        let archive = root.join(release.cached_name(&package));
        if !archive.is_file() {
            let path = format!("{ARCHIVES_DIR}{package}");
            self.remote
                .download(&path, &archive)
                .map_err(|e| CiqwError::DownloadFailed {
                    url: e.url,
                    reason: e.reason,
                })?;
        }

        info!("Extracting '{}' to '{}'.", archive.display(), root.display());
        match format {
            ArchiveFormat::Zip => archive::extract_zip(&archive, root)?,
            ArchiveFormat::Dmg => archive::extract_dmg(
                self.mounter,
                &archive,
                Path::new(MANAGER_VOLUME),
                MANAGER_APP,
                &root.join(MANAGER_APP),
            )?,
        }

        if !binary.exists() {
            return Err(CiqwError::ExtractionFailed {
                archive: archive.display().to_string(),
                reason: format!("'{}' missing after extraction", binary.display()),
            });
        }
        if let Some(dir) = binary.parent() {
            mark_executable(dir)?;
        }

        Ok(binary)
    }

    fn fetch_release(&self) -> Result<ManagerRelease> {
        let document = self
            .remote
            .fetch(RELEASE_PATH)
            .map_err(|e| CiqwError::DownloadFailed {
                url: e.url,
                reason: e.reason,
            })?;

        serde_json::from_slice(&document).map_err(|e| CiqwError::DownloadFailed {
            url: self.remote.url(RELEASE_PATH),
            reason: format!("invalid release document: {e}"),
        })
    }
}
