//! Persisted configuration for ciqw
//!
//! The configuration lives in a single INI file with one `[ciqw]` section:
//!
//! ```ini
//! [ciqw]
//! sdks = /home/dev/.Garmin/ConnectIQ/Sdks
//! sdkmanager = /home/dev/.Garmin/ConnectIQ/SdkManager
//! key = /home/dev/.config/ciqw/key.der
//! device = fenix6
//! flags = --warn
//! version = 4.2.4
//! ```
//!
//! An optional `[logging]` section may carry a `level` filter directive.

pub mod settings;
pub mod store;

pub use settings::Settings;
pub use store::ConfigStore;
