//! Archive formats and extraction
//!
//! SDK and SDK manager packages come as ZIP files or, on macOS, as disk
//! images. ZIP files are extracted directly; disk images are attached, the
//! relevant tree is copied out, and the image is detached again.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::common::fs::copy_dir_recursive;
use crate::error::{CiqwError, Result};

/// Supported package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Dmg,
}

impl ArchiveFormat {
    /// Format of a package, from its file extension
    pub fn from_package(package: &str) -> Result<Self> {
        match package.rsplit_once('.').map(|(_, ext)| ext) {
            Some("zip") => Ok(ArchiveFormat::Zip),
            Some("dmg") => Ok(ArchiveFormat::Dmg),
            _ => Err(CiqwError::UnsupportedArchiveFormat {
                package: package.to_string(),
            }),
        }
    }
}

/// Package file name without its final extension
///
/// `connectiq-sdk-lin-4.2.4-2023-04-05.zip` becomes
/// `connectiq-sdk-lin-4.2.4-2023-04-05`.
pub fn package_stem(package: &str) -> &str {
    package
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(package)
}

/// Extract a ZIP archive into `target`
pub fn extract_zip(archive: &Path, target: &Path) -> Result<()> {
    let failed = |reason: String| CiqwError::ExtractionFailed {
        archive: archive.display().to_string(),
        reason,
    };

    let file = File::open(archive).map_err(|e| failed(e.to_string()))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| failed(e.to_string()))?;

    fs::create_dir_all(target).map_err(|e| failed(e.to_string()))?;
    debug!("Extracting {} entries into {}", zip.len(), target.display());
    zip.extract(target).map_err(|e| failed(e.to_string()))?;

    Ok(())
}

/// Extract a ZIP archive held in memory into `target`
///
/// `label` names the archive in error messages.
pub fn extract_zip_bytes(bytes: &[u8], target: &Path, label: &str) -> Result<()> {
    let failed = |reason: String| CiqwError::ExtractionFailed {
        archive: label.to_string(),
        reason,
    };

    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| failed(e.to_string()))?;
    fs::create_dir_all(target).map_err(|e| failed(e.to_string()))?;
    zip.extract(target).map_err(|e| failed(e.to_string()))
}

/// Attaches and detaches disk images
pub trait Mounter {
    /// Attach `image`; its content then appears under `volume`
    fn attach(&self, image: &Path, volume: &Path) -> std::io::Result<()>;

    /// Detach the image mounted at `volume`
    fn detach(&self, volume: &Path) -> std::io::Result<()>;
}

/// Disk image handling through macOS `hdiutil`
///
/// On other hosts the tool is absent and attaching fails.
pub struct Hdiutil;

impl Hdiutil {
    fn run(args: &[&std::ffi::OsStr]) -> std::io::Result<()> {
        let status = Command::new("hdiutil")
            .args(args)
            .stdout(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("hdiutil exited with {status}")))
        }
    }
}

impl Mounter for Hdiutil {
    fn attach(&self, image: &Path, _volume: &Path) -> std::io::Result<()> {
        Self::run(&["attach".as_ref(), "-nobrowse".as_ref(), image.as_os_str()])
    }

    fn detach(&self, volume: &Path) -> std::io::Result<()> {
        Self::run(&["detach".as_ref(), volume.as_os_str()])
    }
}

/// Copy `item` out of a disk image into `target`
///
/// The image is detached again whether or not the copy succeeded.
pub fn extract_dmg(
    mounter: &dyn Mounter,
    image: &Path,
    volume: &Path,
    item: &str,
    target: &Path,
) -> Result<()> {
    let failed = |reason: String| CiqwError::ExtractionFailed {
        archive: image.display().to_string(),
        reason,
    };

    mounter
        .attach(image, volume)
        .map_err(|e| failed(format!("could not mount disk image: {e}")))?;

    let source = volume.join(item);
    let copied = if source.is_dir() {
        copy_dir_recursive(&source, target).map_err(|e| e.to_string())
    } else {
        Err(format!("'{}' not found in disk image", source.display()))
    };

    if let Err(e) = mounter.detach(volume) {
        warn!("Failed to unmount '{}': {}", volume.display(), e);
    }

    copied.map_err(failed)
}


#[cfg(test)]
mod tests {
    use super::testing::{DirMounter, FailingMounter};
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_format_from_package() {
        assert_eq!(
            ArchiveFormat::from_package("sdk-1.0.zip").unwrap(),
            ArchiveFormat::Zip
        );
        assert_eq!(
            ArchiveFormat::from_package("sdk-1.0.dmg").unwrap(),
            ArchiveFormat::Dmg
        );
    }

    #[test]
    fn test_format_rejects_other_extensions() {
        for package in ["sdk.tar.gz", "sdk.exe", "sdk"] {
            assert!(matches!(
                ArchiveFormat::from_package(package),
                Err(CiqwError::UnsupportedArchiveFormat { .. })
            ));
        }
    }

    #[test]
    fn test_package_stem() {
        assert_eq!(
            package_stem("connectiq-sdk-lin-4.2.4-2023-04-05-5830cc591.zip"),
            "connectiq-sdk-lin-4.2.4-2023-04-05-5830cc591"
        );
        assert_eq!(package_stem("a.b.c.dmg"), "a.b.c");
        assert_eq!(
            ArchiveFormat::from_package("x.zip").unwrap(),
            ArchiveFormat::Zip
        );
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("sdk.zip");
        write_zip(&archive, &[("bin/monkeyc", "#!/bin/sh"), ("README.html", "<p/>")]);

        let target = temp.path().join("sdk");
        extract_zip(&archive, &target).unwrap();
        assert!(target.join("bin/monkeyc").is_file());
        assert!(target.join("README.html").is_file());
    }

    #[test]
    fn test_extract_corrupt_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("sdk.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let result = extract_zip(&archive, &temp.path().join("sdk"));
        assert!(matches!(result, Err(CiqwError::ExtractionFailed { .. })));
    }

    #[test]
    fn test_extract_zip_bytes() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("font.zip");
        write_zip(&archive, &[("Roboto.cft", "font")]);

        let bytes = fs::read(&archive).unwrap();
        extract_zip_bytes(&bytes, &temp.path().join("Fonts"), "Roboto").unwrap();
        assert!(temp.path().join("Fonts/Roboto.cft").is_file());

        let result = extract_zip_bytes(b"junk", &temp.path().join("Fonts"), "Broken");
        assert!(matches!(
            result,
            Err(CiqwError::ExtractionFailed { ref archive, .. }) if archive == "Broken"
        ));
    }

    #[test]
    fn test_extract_dmg_mount_failure() {
        let temp = TempDir::new().unwrap();
        let result = extract_dmg(
            &FailingMounter,
            &temp.path().join("sdk.dmg"),
            &temp.path().join("volume"),
            "sdk",
            &temp.path().join("target"),
        );
        assert!(matches!(result, Err(CiqwError::ExtractionFailed { .. })));
    }

    #[test]
    fn test_extract_dmg_copies_and_detaches() {
        let temp = TempDir::new().unwrap();
        let volume = temp.path().join("volume");
        fs::create_dir_all(volume.join("sdk/bin")).unwrap();
        fs::write(volume.join("sdk/bin/monkeyc"), "").unwrap();

        let mounter = DirMounter::default();
        let target = temp.path().join("target");
        extract_dmg(&mounter, &temp.path().join("sdk.dmg"), &volume, "sdk", &target).unwrap();

        assert!(target.join("bin/monkeyc").exists());
        assert_eq!(mounter.attached.get(), 1);
        assert_eq!(mounter.detached.get(), 1);
    }

    #[test]
    fn test_extract_dmg_missing_item_still_detaches() {
        let temp = TempDir::new().unwrap();
        let volume = temp.path().join("volume");
        fs::create_dir_all(&volume).unwrap();

        let mounter = DirMounter::default();
        let result = extract_dmg(
            &mounter,
            &temp.path().join("sdk.dmg"),
            &volume,
            "sdk",
            &temp.path().join("target"),
        );

        assert!(matches!(result, Err(CiqwError::ExtractionFailed { .. })));
        assert_eq!(mounter.detached.get(), 1);
    }
}
