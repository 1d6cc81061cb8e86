//! Host platform profile
//!
//! Every platform-dependent decision (where the vendor keeps its files, which
//! catalog key names our package, how tools are named and how documents are
//! opened) is answered by a single [`Platform`] value selected once at startup.

use std::fmt;
use std::path::{Path, PathBuf};

pub mod detection;

pub use detection::detect;

/// Compiler tool name; its presence in `bin/` marks an SDK as installed
pub const COMPILER: &str = "monkeyc";

/// Device runner tool name
pub const RUNNER: &str = "monkeydo";

/// Simulator tool name
pub const SIMULATOR: &str = "simulator";

/// A host platform supported by the vendor's SDK packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    Mac,
}

impl Platform {
    /// Key naming this platform's package in the remote catalogs
    pub fn catalog_key(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Mac => "mac",
        }
    }

    /// Root of the vendor's per-user data (SDKs, devices, fonts, token file)
    pub fn garmin_root(self, home: &Path) -> PathBuf {
        match self {
            Platform::Linux => home.join(".Garmin").join("ConnectIQ"),
            Platform::Windows => home
                .join("AppData")
                .join("Roaming")
                .join("Garmin")
                .join("ConnectIQ"),
            Platform::Mac => home
                .join("Library")
                .join("Application Support")
                .join("Garmin")
                .join("ConnectIQ"),
        }
    }

    /// Path of an SDK tool relative to the SDK's `bin/` directory
    pub fn tool_subpath(self, tool: &str) -> PathBuf {
        match (self, tool) {
            (Platform::Mac, SIMULATOR) => PathBuf::from("ConnectIQ.app")
                .join("Contents")
                .join("MacOS")
                .join(SIMULATOR),
            (Platform::Windows, SIMULATOR) => PathBuf::from(format!("{SIMULATOR}.exe")),
            (Platform::Windows, other) => PathBuf::from(format!("{other}.bat")),
            (_, other) => PathBuf::from(other),
        }
    }

    /// Path of the SDK manager executable relative to the manager's install root
    pub fn sdkmanager_subpath(self) -> PathBuf {
        match self {
            Platform::Mac => PathBuf::from("SdkManager.app")
                .join("Contents")
                .join("MacOS")
                .join("sdkmanager"),
            Platform::Windows => PathBuf::from("bin").join("sdkmanager.exe"),
            Platform::Linux => PathBuf::from("bin").join("sdkmanager"),
        }
    }

    /// Command (program and leading arguments) that opens a file or directory
    /// in the desktop's default application
    pub fn opener(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Platform::Linux => ("xdg-open", &[]),
            Platform::Mac => ("open", &[]),
            Platform::Windows => ("explorer", &[]),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_key())
    }
}
