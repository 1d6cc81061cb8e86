//! Finding the SDK tools for the configured version

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigStore, Settings};
use crate::error::Result;
use crate::platform::{COMPILER, Platform};
use crate::remote::Remote;

use super::archive::Mounter;
use super::catalog::SdkCatalogResolver;
use super::installer::SdkInstaller;

/// Name prefix of extracted SDK directories
pub const SDK_DIR_PREFIX: &str = "connectiq-sdk-";

/// Whether a directory name carries `version` as a `-`-delimited token
fn names_version(dir_name: &str, version: &str) -> bool {
    dir_name.contains(&format!("-{version}-")) || dir_name.ends_with(&format!("-{version}"))
}

/// Root of an installed SDK for `version` under `sdks`, if one exists
///
/// Only directories with a compiler in `bin/` count; a partially extracted
/// SDK is treated as absent.
pub fn find_installed(sdks: &Path, version: &str, platform: Platform) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(sdks)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(SDK_DIR_PREFIX) && names_version(&name, version)
        })
        .map(|entry| entry.path())
        .filter(|path| path.join("bin").join(platform.tool_subpath(COMPILER)).exists())
        .collect();

    // read_dir order is unspecified
    candidates.sort();
    candidates.into_iter().next()
}

/// Locates SDK tools, installing the SDK when the configuration is stale
pub struct SdkLocator<'a> {
    remote: &'a dyn Remote,
    mounter: &'a dyn Mounter,
    store: &'a ConfigStore,
    platform: Platform,
}

impl<'a> SdkLocator<'a> {
    pub fn new(
        remote: &'a dyn Remote,
        mounter: &'a dyn Mounter,
        store: &'a ConfigStore,
        platform: Platform,
    ) -> Self {
        Self {
            remote,
            mounter,
            store,
            platform,
        }
    }

    pub fn resolver(&self) -> SdkCatalogResolver<'a> {
        SdkCatalogResolver::new(self.remote, self.platform)
    }

    pub fn installer(&self) -> SdkInstaller<'a> {
        SdkInstaller::new(self.remote, self.mounter, self.store, self.platform)
    }

    /// Resolve `version` (or the newest stable one) and install it
    ///
    /// Returns the SDK's `bin/` directory.
    pub fn install(&self, version: Option<&str>, settings: &mut Settings) -> Result<PathBuf> {
        let entry = self.resolver().resolve_version(version)?;
        self.installer().ensure_installed(&entry, settings)
    }

    /// Root directory of the SDK for the configured version
    pub fn sdk_root(&self, settings: &mut Settings) -> Result<PathBuf> {
        if let Some(version) = settings.version.as_deref() {
            if let Some(root) = find_installed(&settings.sdks, version, self.platform) {
                debug!("Using SDK {} at {}", version, root.display());
                return Ok(root);
            }
            debug!("SDK {} not found under {}", version, settings.sdks.display());
        }

        let requested = settings.version.clone();
        let bin = self.install(requested.as_deref(), settings)?;
        Ok(bin.parent().map(Path::to_path_buf).unwrap_or(bin))
    }

    /// Path of an SDK tool for the configured version
    pub fn tool_path(&self, settings: &mut Settings, tool: &str) -> Result<PathBuf> {
        let root = self.sdk_root(settings)?;
        Ok(root.join("bin").join(self.platform.tool_subpath(tool)))
    }
}
