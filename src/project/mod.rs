//! Connect IQ project layout and compiler arguments
//!
//! A project is a directory holding `manifest.xml` and, optionally, one or
//! more `.jungle` build files. The manifest's application entry names the
//! build outputs: `<entry>.prg` for device builds, `<entry>.iq` for release
//! packages.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::error::{CiqwError, Result};

/// Project manifest file name
pub const MANIFEST: &str = "manifest.xml";

/// Namespace of Connect IQ manifests
const MANIFEST_NAMESPACE: &str = "http://www.garmin.com/xml/connectiq";

/// Build output kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    /// Device build, runnable in the simulator
    Debug,
    /// Store package
    Release,
}

impl BuildKind {
    pub fn extension(self) -> &'static str {
        match self {
            BuildKind::Debug => "prg",
            BuildKind::Release => "iq",
        }
    }
}

/// Application entry of a manifest document
///
/// The `application` element is looked up by namespace, whatever prefix the
/// document binds to it.
pub fn manifest_entry(document: &str) -> std::result::Result<String, String> {
    let document = roxmltree::Document::parse(document).map_err(|e| e.to_string())?;
    let application = document
        .descendants()
        .find(|node| node.has_tag_name((MANIFEST_NAMESPACE, "application")))
        .ok_or_else(|| "not a Connect IQ manifest".to_string())?;

    application
        .attribute("entry")
        .map(str::to_string)
        .ok_or_else(|| "no application entry".to_string())
}

/// A Connect IQ project on disk
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    entry: String,
}

impl Project {
    /// Open the project rooted at `root`, reading its manifest
    pub fn open(root: &Path) -> Result<Self> {
        let manifest = root.join(MANIFEST);
        let invalid = |reason: String| CiqwError::ManifestInvalid {
            path: manifest.display().to_string(),
            reason,
        };

        let document = fs::read_to_string(&manifest).map_err(|e| invalid(e.to_string()))?;
        let entry = manifest_entry(&document).map_err(invalid)?;
        debug!("Project entry '{}' in {}", entry, root.display());

        Ok(Self {
            root: root.to_path_buf(),
            entry,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output file name, relative to the project root
    pub fn output_name(&self, kind: BuildKind) -> String {
        format!("{}.{}", self.entry, kind.extension())
    }

    /// Output file path
    pub fn output_path(&self, kind: BuildKind) -> PathBuf {
        self.root.join(self.output_name(kind))
    }

    /// `.jungle` files at the project root, sorted by name
    pub fn jungles(&self) -> Result<Vec<String>> {
        let mut jungles: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".jungle"))
            .collect();
        jungles.sort();
        Ok(jungles)
    }
}

/// Compiler arguments for a build
///
/// Device builds target the configured device; release builds package the
/// application for every device the manifest lists.
pub fn compile_args(
    kind: BuildKind,
    jungles: &[String],
    output: &str,
    settings: &Settings,
    flags: Vec<String>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    if !jungles.is_empty() {
        args.push("--jungles".into());
        args.push(jungles.join(";").into());
    }

    match kind {
        BuildKind::Debug => {
            args.push("--device".into());
            args.push(settings.device.as_str().into());
        }
        BuildKind::Release => {
            args.push("--release".into());
            args.push("--package-app".into());
        }
    }

    args.push("--output".into());
    args.push(output.into());
    args.push("--private-key".into());
    args.push(settings.key.as_os_str().to_owned());
    args.extend(flags.into_iter().map(OsString::from));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{DEFAULT_BASE_URL, Environment};
    use tempfile::TempDir;

    const MANIFEST_XML: &str = r#"<?xml version="1.0"?>
<iq:manifest xmlns:iq="http://www.garmin.com/xml/connectiq" version="3">
    <iq:application entry="HelloApp" id="1234" launcherIcon="@Drawables.LauncherIcon"
        name="@Strings.AppName" type="watch-app" minApiLevel="3.0.0">
        <iq:products>
            <iq:product id="fenix6"/>
        </iq:products>
    </iq:application>
</iq:manifest>
"#;

    fn settings() -> Settings {
        let env = Environment::new(
            PathBuf::from("/home/dev"),
            PathBuf::from("/home/dev/.config/ciqw/config.ini"),
            DEFAULT_BASE_URL,
            "linux",
        );
        Settings::defaults(&env)
    }

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_manifest_entry() {
        assert_eq!(manifest_entry(MANIFEST_XML).unwrap(), "HelloApp");
    }

    #[test]
    fn test_manifest_entry_attribute_order() {
        let document = r#"<manifest xmlns="http://www.garmin.com/xml/connectiq">
            <application id="x" entry='OtherApp'/></manifest>"#;
        assert_eq!(manifest_entry(document).unwrap(), "OtherApp");
    }

    #[test]
    fn test_manifest_without_entry() {
        let document = r#"<iq:manifest xmlns:iq="http://www.garmin.com/xml/connectiq">
            <iq:application id="x"/></iq:manifest>"#;
        assert!(manifest_entry(document).is_err());
    }

    #[test]
    fn test_manifest_other_namespace() {
        assert!(manifest_entry(r#"<application entry="X"/>"#).is_err());
        let document = r#"<iq:manifest xmlns:iq="http://example.com/other">
            <iq:application entry="X"/></iq:manifest>"#;
        assert!(manifest_entry(document).is_err());
    }

    #[test]
    fn test_manifest_commented_application_ignored() {
        let document = r#"<iq:manifest xmlns:iq="http://www.garmin.com/xml/connectiq">
            <!-- <iq:application entry="OldApp"/> -->
            <iq:application id="x" entry="RealApp"/></iq:manifest>"#;
        assert_eq!(manifest_entry(document).unwrap(), "RealApp");
    }

    #[test]
    fn test_manifest_any_prefix() {
        let document = r#"<ciq:manifest xmlns:ciq="http://www.garmin.com/xml/connectiq">
            <ciq:application id="x" entry="PrefixedApp"/></ciq:manifest>"#;
        assert_eq!(manifest_entry(document).unwrap(), "PrefixedApp");
    }

    #[test]
    fn test_manifest_malformed() {
        assert!(manifest_entry("<iq:manifest").is_err());
    }

    #[test]
    fn test_open_project() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST), MANIFEST_XML).unwrap();
        fs::write(temp.path().join("monkey.jungle"), "").unwrap();
        fs::write(temp.path().join("barrel.jungle"), "").unwrap();
        fs::create_dir(temp.path().join("dir.jungle")).unwrap();

        let project = Project::open(temp.path()).unwrap();
        assert_eq!(project.output_name(BuildKind::Debug), "HelloApp.prg");
        assert_eq!(
            project.output_path(BuildKind::Release),
            temp.path().join("HelloApp.iq")
        );
        assert_eq!(
            project.jungles().unwrap(),
            vec!["barrel.jungle", "monkey.jungle"]
        );
    }

    #[test]
    fn test_open_without_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Project::open(temp.path()),
            Err(CiqwError::ManifestInvalid { .. })
        ));
    }

    #[test]
    fn test_debug_args() {
        let args = compile_args(
            BuildKind::Debug,
            &["a.jungle".to_string(), "b.jungle".to_string()],
            "HelloApp.prg",
            &settings(),
            vec!["--warn".to_string()],
        );
        assert_eq!(
            as_strings(&args),
            vec![
                "--jungles",
                "a.jungle;b.jungle",
                "--device",
                "fenix6",
                "--output",
                "HelloApp.prg",
                "--private-key",
                "/home/dev/.config/ciqw/key.der",
                "--warn",
            ]
        );
    }

    #[test]
    fn test_release_args() {
        let args = as_strings(&compile_args(
            BuildKind::Release,
            &[],
            "HelloApp.iq",
            &settings(),
            Vec::new(),
        ));
        assert!(!args.contains(&"--device".to_string()));
        assert!(!args.contains(&"--jungles".to_string()));
        let release = args.iter().position(|a| a == "--release").unwrap();
        assert_eq!(args[release + 1], "--package-app");
        assert!(args.contains(&"HelloApp.iq".to_string()));
    }
}
