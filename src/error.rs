//! Error types and handling for ciqw
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for ciqw operations
#[derive(Error, Diagnostic, Debug)]
pub enum CiqwError {
    // Platform errors
    #[error("Unable to find a package for your OS: '{os}'")]
    #[diagnostic(
        code(ciqw::platform::unsupported),
        help("Supported platforms: linux, windows, mac")
    )]
    PlatformUnsupported { os: String },

    // Catalog errors
    #[error("SDK catalog unavailable at {url}: {reason}")]
    #[diagnostic(
        code(ciqw::catalog::unavailable),
        help("Check your network connection or the --base-url setting")
    )]
    CatalogUnavailable { url: String, reason: String },

    #[error("Version '{version}' is not available.")]
    #[diagnostic(
        code(ciqw::catalog::version_not_found),
        help("Run 'ciqw list-sdks' to see the versions available for your platform")
    )]
    VersionNotFound { version: String },

    // Installation errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(code(ciqw::sdk::download_failed))]
    DownloadFailed { url: String, reason: String },

    #[error("Failed to extract '{archive}': {reason}")]
    #[diagnostic(
        code(ciqw::sdk::extraction_failed),
        help("Delete the archive to force a fresh download on the next run")
    )]
    ExtractionFailed { archive: String, reason: String },

    #[error("Unsupported archive format: '{package}'")]
    #[diagnostic(
        code(ciqw::sdk::unsupported_archive),
        help("Only .zip and .dmg packages are supported")
    )]
    UnsupportedArchiveFormat { package: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(ciqw::config::not_found), help("Run 'ciqw init' to create one"))]
    ConfigNotFound { path: String },

    #[error("Would not overwrite '{path}'.")]
    #[diagnostic(code(ciqw::config::already_exists))]
    ConfigAlreadyExists { path: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(ciqw::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to write configuration file {path}: {reason}")]
    #[diagnostic(code(ciqw::config::write_failed))]
    ConfigWriteFailed { path: String, reason: String },

    #[error("Unknown configuration key: '{key}'")]
    #[diagnostic(
        code(ciqw::config::unknown_key),
        help("Known keys: sdks, sdkmanager, key, device, flags, version")
    )]
    UnknownConfigKey { key: String },

    // Project errors
    #[error("Invalid manifest {path}: {reason}")]
    #[diagnostic(
        code(ciqw::project::manifest_invalid),
        help("Run the command from a Connect IQ project directory or pass its path")
    )]
    ManifestInvalid { path: String, reason: String },

    // Subprocess errors
    #[error("'{tool}' exited with {status}")]
    #[diagnostic(code(ciqw::tool::failed))]
    ToolFailed { tool: String, status: String },

    #[error("Failed to launch '{tool}': {reason}")]
    #[diagnostic(code(ciqw::tool::launch_failed))]
    ToolLaunchFailed { tool: String, reason: String },

    #[error("Failed to generate signing key {path}: {reason}")]
    #[diagnostic(
        code(ciqw::key::generation_failed),
        help("Key generation needs the 'openssl' command on your PATH")
    )]
    KeyGenerationFailed { path: String, reason: String },

    // Vendor service errors
    #[error("Authentication failed: {reason}")]
    #[diagnostic(code(ciqw::auth::failed))]
    AuthFailed { reason: String },

    #[error("You need to login to install fonts and devices")]
    #[diagnostic(code(ciqw::auth::not_logged_in), help("Run 'ciqw login' first"))]
    NotLoggedIn,

    #[error("Asset service request failed for {url}: {reason}")]
    #[diagnostic(code(ciqw::assets::request_failed))]
    AssetRequestFailed { url: String, reason: String },

    // Watch errors
    #[error("File watching failed: {reason}")]
    #[diagnostic(code(ciqw::watch::failed))]
    WatchFailed { reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(ciqw::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for CiqwError {
    fn from(err: std::io::Error) -> Self {
        CiqwError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for CiqwError {
    fn from(err: inquire::InquireError) -> Self {
        CiqwError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<notify::Error> for CiqwError {
    fn from(err: notify::Error) -> Self {
        CiqwError::WatchFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CiqwError>;
