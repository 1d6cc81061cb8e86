//! Fonts and device definitions from the vendor's asset service
//!
//! Both are listed by the service and downloaded as ZIP archives. Fonts are
//! extracted into `<garmin root>/Fonts` with an `.md5` marker recording the
//! hash of the installed version; devices are extracted into
//! `<garmin root>/Devices/<name>` and never updated once present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{CiqwError, Result};
use crate::sdk::archive::extract_zip_bytes;

/// Asset service base
pub const ASSET_BASE: &str = "https://api.gcs.garmin.com/ciq-product-onboarding/";

/// A font published by the service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontInfo {
    pub name: String,
    pub font_hash: String,
}

/// A device definition published by the service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub name: String,
    pub part_number: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The vendor's asset service
pub trait AssetApi {
    fn fonts(&self) -> Result<Vec<FontInfo>>;
    fn devices(&self) -> Result<Vec<DeviceInfo>>;
    fn font_archive(&self, name: &str) -> Result<Vec<u8>>;
    fn device_archive(&self, part_number: &str) -> Result<Vec<u8>>;
}

/// Asset service over HTTP, authenticated with a bearer token
pub struct HttpAssetApi {
    client: reqwest::blocking::Client,
    token: String,
    base: String,
}

impl HttpAssetApi {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base(token, ASSET_BASE)
    }

    pub fn with_base(token: &str, base: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("ciqw/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CiqwError::AssetRequestFailed {
                url: base.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            token: token.to_string(),
            base: base.to_string(),
        })
    }

    fn get(&self, path: &str, query: &[(&str, &str)], accept: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base, path);
        let failed = |reason: String| CiqwError::AssetRequestFailed {
            url: url.clone(),
            reason,
        };

        debug!("Sending HTTP GET request to {}", url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(failed("access token rejected, run 'ciqw login' again".to_string()));
        }
        if !status.is_success() {
            return Err(failed(format!("server returned {status}")));
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| failed(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get(path, &[], "application/json")?;
        serde_json::from_slice(&body).map_err(|e| CiqwError::AssetRequestFailed {
            url: format!("{}{}", self.base, path),
            reason: format!("invalid listing: {e}"),
        })
    }
}

impl AssetApi for HttpAssetApi {
    fn fonts(&self) -> Result<Vec<FontInfo>> {
        self.get_json("fonts")
    }

    fn devices(&self) -> Result<Vec<DeviceInfo>> {
        self.get_json("devices")
    }

    fn font_archive(&self, name: &str) -> Result<Vec<u8>> {
        self.get("fonts/font", &[("fontName", name)], "*/*")
    }

    fn device_archive(&self, part_number: &str) -> Result<Vec<u8>> {
        self.get(&format!("devices/{part_number}/ciqInfo"), &[], "*/*")
    }
}

/// Names from the service become file names; refuse anything path-like
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Installs assets under the vendor data directory
pub struct AssetInstaller<'a> {
    api: &'a dyn AssetApi,
    garmin_root: PathBuf,
}

impl<'a> AssetInstaller<'a> {
    pub fn new(api: &'a dyn AssetApi, garmin_root: &Path) -> Self {
        Self {
            api,
            garmin_root: garmin_root.to_path_buf(),
        }
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.garmin_root.join("Fonts")
    }

    pub fn devices_dir(&self) -> PathBuf {
        self.garmin_root.join("Devices")
    }

    /// Install fonts that are missing or outdated; returns how many were installed
    pub fn install_fonts(&self) -> Result<usize> {
        let root = self.fonts_dir();
        fs::create_dir_all(&root)?;

        let mut installed = 0;
        for font in self.api.fonts()? {
            if !is_safe_name(&font.name) {
                warn!("Skipping font with invalid name '{}'", font.name);
                continue;
            }

            let font_file = root.join(format!("{}.cft", font.name));
            let marker = root.join(format!("{}.md5", font.name));
            let current = fs::read_to_string(&marker).unwrap_or_default();
            if font_file.exists() && current.trim() == font.font_hash {
                debug!("Font '{}' is up to date", font.name);
                continue;
            }

            info!("Downloading font '{}'.", font.name);
            let archive = self.api.font_archive(&font.name)?;
            extract_zip_bytes(&archive, &root, &font.name)?;
            fs::write(&marker, &font.font_hash)?;
            installed += 1;
        }

        Ok(installed)
    }

    /// Install device definitions that are not present yet
    pub fn install_devices(&self) -> Result<usize> {
        let root = self.devices_dir();
        fs::create_dir_all(&root)?;

        let mut installed = 0;
        for device in self.api.devices()? {
            if !is_safe_name(&device.name) {
                warn!("Skipping device with invalid name '{}'", device.name);
                continue;
            }

            let target = root.join(&device.name);
            if target.exists() {
                continue;
            }

            info!(
                "Downloading device '{}'.",
                device.display_name.as_deref().unwrap_or(&device.name)
            );
            let archive = self.api.device_archive(&device.part_number)?;

            // Extract next to the target and move it into place, so an
            // interrupted extraction is retried on the next run
            let staging = tempfile::TempDir::new_in(&root)?;
            extract_zip_bytes(&archive, staging.path(), &device.name)?;
            fs::rename(staging.path(), &target)?;
            // Staging directories are private; match the other vendor directories
            fs::set_permissions(&target, fs::metadata(&root)?.permissions())?;
            installed += 1;
        }

        Ok(installed)
    }
}
