//! Bringing a resolved SDK version onto disk
//!
//! Installation is a sequence of idempotent steps. Each one checks the disk
//! first, so running [`SdkInstaller::ensure_installed`] on a complete
//! installation touches neither the network nor the archive:
//!
//! 1. The package format is checked before any I/O.
//! 2. An SDK whose `bin/<compiler>` exists is taken as installed.
//! 3. A missing archive is downloaded into the SDK directory.
//! 4. The archive is extracted into `<sdks>/<package stem>`; an archive that
//!    fails to extract or lacks the compiler is deleted.
//! 5. Tools under `bin/` are marked executable.
//! 6. The configured version is updated when it differs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::fs::mark_executable;
use crate::config::{ConfigStore, Settings};
use crate::error::{CiqwError, Result};
use crate::platform::{COMPILER, Platform};
use crate::remote::Remote;

use super::archive::{self, ArchiveFormat, Mounter};
use super::catalog::{PACKAGES_DIR, SdkCatalogEntry};

/// Volume under which the SDK disk image appears when attached
pub const SDK_VOLUME: &str = "/Volumes/Connect IQ SDK";

/// Installs SDK releases into the configured SDK directory
pub struct SdkInstaller<'a> {
    remote: &'a dyn Remote,
    mounter: &'a dyn Mounter,
    store: &'a ConfigStore,
    platform: Platform,
}

impl<'a> SdkInstaller<'a> {
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

    /// Directory an entry is (or will be) extracted into
    pub fn target_dir(sdks: &Path, entry: &SdkCatalogEntry) -> PathBuf {
        sdks.join(archive::package_stem(&entry.package))
    }

    /// Make sure `entry` is installed and recorded; returns its `bin/` directory
    pub fn ensure_installed(
        &self,
        entry: &SdkCatalogEntry,
        settings: &mut Settings,
    ) -> Result<PathBuf> {
        let format = ArchiveFormat::from_package(&entry.package)?;

        let target = Self::target_dir(&settings.sdks, entry);
        let bin = target.join("bin");
        let compiler = bin.join(self.platform.tool_subpath(COMPILER));

        if compiler.exists() {
            debug!("SDK {} already installed at {}", entry.version, target.display());
        } else {
            let archive = settings.sdks.join(&entry.package);
            self.download(entry, &archive)?;
            // An archive that cannot produce the compiler is never reused
            self.extract(format, entry, &archive, &target, &compiler)
                .inspect_err(|_| discard_archive(&archive))?;
            info!("Installed SDK {} into '{}'", entry.version, target.display());
        }

        let marked = mark_executable(&bin)?;
        debug!("Marked {} files executable under {}", marked, bin.display());

        self.store.record_version(settings, &entry.version)?;
        Ok(bin)
    }

    fn download(&self, entry: &SdkCatalogEntry, archive: &Path) -> Result<()> {
        if archive.is_file() {
            debug!("Using cached archive {}", archive.display());
            return Ok(());
        }

        let path = format!("{PACKAGES_DIR}{}", entry.package);
        self.remote
            .download(&path, archive)
            .map_err(|e| CiqwError::DownloadFailed {
                url: e.url,
                reason: e.reason,
            })?;
        Ok(())
    }

    fn extract(
        &self,
        format: ArchiveFormat,
        entry: &SdkCatalogEntry,
        archive: &Path,
        target: &Path,
        compiler: &Path,
    ) -> Result<()> {
        info!("Extracting '{}'", archive.display());
        match format {
            ArchiveFormat::Zip => archive::extract_zip(archive, target)?,
            ArchiveFormat::Dmg => archive::extract_dmg(
                self.mounter,
                archive,
                Path::new(SDK_VOLUME),
                archive::package_stem(&entry.package),
                target,
            )?,
        }

        if !compiler.exists() {
            return Err(CiqwError::ExtractionFailed {
                archive: archive.display().to_string(),
                reason: format!("'{}' missing after extraction", compiler.display()),
            });
        }
        Ok(())
    }
}

fn discard_archive(archive: &Path) {
    if let Err(e) = fs::remove_file(archive) {
        warn!("Could not remove '{}': {}", archive.display(), e);
    }
}
