//! SDK version resolution and installation
//!
//! - [`catalog`]: which releases exist and which archive serves this host
//! - [`installer`]: download, extract and record a release
//! - [`locate`]: find the tools of the configured release
//! - [`manager`]: the vendor's graphical SDK manager
//! - [`archive`]: ZIP and disk image handling shared by the installers

pub mod archive;
pub mod catalog;
pub mod installer;
pub mod locate;
pub mod manager;

pub use archive::Hdiutil;
pub use catalog::SdkCatalogEntry;
pub use locate::SdkLocator;
pub use manager::SdkManagerInstaller;
