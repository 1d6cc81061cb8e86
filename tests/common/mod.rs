//! Common test utilities for ciqw integration tests

use std::io::{Cursor, Write};
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// An isolated home directory, configuration file and download mirror
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Root of the temporary directory
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("home")).expect("Failed to create home directory");
        Self { temp, path }
    }

    /// Fake home directory
    pub fn home(&self) -> PathBuf {
        self.path.join("home")
    }

    /// Configuration file used by [`TestWorkspace::ciqw`]
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config").join("ciqw.ini")
    }

    /// Local download mirror used by [`TestWorkspace::ciqw`]
    pub fn mirror(&self) -> PathBuf {
        self.path.join("mirror")
    }

    /// Write a file relative to the workspace root
    pub fn write_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file relative to the workspace root
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Publish an SDK catalog in the mirror
    pub fn publish_catalog(&self, catalog: &str) {
        self.write_file("mirror/sdks/sdks.json", catalog);
    }

    /// Publish an SDK archive holding the usual tools in the mirror
    #[allow(dead_code)]
    pub fn publish_sdk(&self, package: &str) {
        self.write_file(&format!("mirror/sdks/{package}"), sdk_zip());
    }

    /// The ciqw binary, isolated to this workspace
    #[allow(deprecated)]
    pub fn ciqw(&self) -> Command {
        let mut cmd = Command::cargo_bin("ciqw").unwrap();
        cmd.env("HOME", self.home())
            .env("CIQW_INI", self.config_path())
            .env("CIQW_BASE_URL", self.mirror())
            .env_remove("RUST_LOG")
            .current_dir(&self.path);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A minimal SDK archive: compiler, runner, simulator and documentation
pub fn sdk_zip() -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for name in ["bin/monkeyc", "bin/monkeydo", "bin/simulator"] {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(b"#!/bin/sh\nexit 0\n").unwrap();
    }
    zip.start_file("README.html", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<html/>").unwrap();
    zip.finish().unwrap().into_inner()
}
