//! SDK catalog: which versions exist and which archive serves this platform

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CiqwError, Result};
use crate::platform::Platform;
use crate::remote::Remote;

/// Catalog document, relative to the service base
pub const CATALOG_PATH: &str = "sdks/sdks.json";

/// Directory of SDK archives, relative to the service base
pub const PACKAGES_DIR: &str = "sdks/";

/// Marker of pre-release versions, skipped when no version is requested
const PREVIEW_MARKER: &str = "preview";

/// One SDK release available for the current platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkCatalogEntry {
    pub version: String,
    pub title: String,
    pub release_date: String,
    /// Archive file name for the current platform
    pub package: String,
}

/// Catalog record as published; platform keys map to archive names
#[derive(Debug, Deserialize)]
struct RawEntry {
    version: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    release: Option<String>,
    #[serde(flatten)]
    packages: HashMap<String, serde_json::Value>,
}

/// Parse a catalog document, keeping entries that ship a package for `platform`
///
/// Source order is preserved. A repeated version replaces the earlier
/// record's data without moving it.
pub fn parse_catalog(
    document: &[u8],
    platform: Platform,
) -> std::result::Result<Vec<SdkCatalogEntry>, serde_json::Error> {
    let raw: Vec<RawEntry> = serde_json::from_slice(document)?;
    let mut entries: Vec<SdkCatalogEntry> = Vec::with_capacity(raw.len());

    for record in raw {
        let Some(package) = record
            .packages
            .get(platform.catalog_key())
            .and_then(|value| value.as_str())
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let entry = SdkCatalogEntry {
            version: record.version,
            title: record.title.unwrap_or_default(),
            release_date: record.release.unwrap_or_default(),
            package: package.to_string(),
        };

        match entries.iter_mut().find(|e| e.version == entry.version) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    Ok(entries)
}

/// Pick an entry from a catalog listing
///
/// An explicit version must match exactly. Without one, the last stable
/// (non-preview) entry in catalog order wins.
pub fn select_version<'a>(
    entries: &'a [SdkCatalogEntry],
    requested: Option<&str>,
) -> Result<&'a SdkCatalogEntry> {
    match requested {
        Some(version) => entries
            .iter()
            .find(|e| e.version == version)
            .ok_or_else(|| CiqwError::VersionNotFound {
                version: version.to_string(),
            }),
        None => entries
            .iter()
            .filter(|e| !e.version.contains(PREVIEW_MARKER))
            .next_back()
            .ok_or_else(|| CiqwError::VersionNotFound {
                version: "latest stable".to_string(),
            }),
    }
}

/// Answers catalog questions against the remote service
pub struct SdkCatalogResolver<'a> {
    remote: &'a dyn Remote,
    platform: Platform,
}

impl<'a> SdkCatalogResolver<'a> {
    pub fn new(remote: &'a dyn Remote, platform: Platform) -> Self {
        Self { remote, platform }
    }

    /// Every release that ships a package for this platform, in catalog order
    pub fn list_available(&self) -> Result<Vec<SdkCatalogEntry>> {
        let document = self
            .remote
            .fetch(CATALOG_PATH)
            .map_err(|e| CiqwError::CatalogUnavailable {
                url: e.url,
                reason: e.reason,
            })?;

        let entries =
            parse_catalog(&document, self.platform).map_err(|e| CiqwError::CatalogUnavailable {
                url: self.remote.url(CATALOG_PATH),
                reason: format!("invalid catalog document: {e}"),
            })?;

        debug!(
            "Catalog lists {} SDK releases for {}",
            entries.len(),
            self.platform
        );
        Ok(entries)
    }

    /// The requested version, or the newest stable one
    pub fn resolve_version(&self, requested: Option<&str>) -> Result<SdkCatalogEntry> {
        let entries = self.list_available()?;
        select_version(&entries, requested).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform;
    use crate::remote::testing::FakeRemote;

    const CATALOG: &str = r#"[
        {"version": "3.1.0", "title": "Connect IQ 3.1.0", "release": "2019-10-01",
         "linux": "connectiq-sdk-lin-3.1.0.zip", "windows": "connectiq-sdk-win-3.1.0.zip",
         "mac": "connectiq-sdk-mac-3.1.0.dmg"},
        {"version": "3.2.0-preview", "title": "Preview", "release": "2020-01-01",
         "linux": "connectiq-sdk-lin-3.2.0-preview.zip", "mac": "connectiq-sdk-mac-3.2.0-preview.dmg"},
        {"version": "2.4.9", "title": "Windows only", "release": "2018-01-01",
         "windows": "connectiq-sdk-win-2.4.9.zip"}
    ]"#;

    fn entry(version: &str) -> SdkCatalogEntry {
        SdkCatalogEntry {
            version: version.to_string(),
            title: String::new(),
            release_date: String::new(),
            package: format!("connectiq-sdk-lin-{version}.zip"),
        }
    }

    #[test]
    fn test_parse_filters_by_platform() {
        let entries = parse_catalog(CATALOG.as_bytes(), Platform::Linux).unwrap();
        let versions: Vec<_> = entries.iter().map(|e| e.version.as_str()).collect();
        assert_eq!(versions, vec!["3.1.0", "3.2.0-preview"]);
        assert_eq!(entries[0].package, "connectiq-sdk-lin-3.1.0.zip");
        assert_eq!(entries[0].title, "Connect IQ 3.1.0");
        assert_eq!(entries[0].release_date, "2019-10-01");

        let windows = parse_catalog(CATALOG.as_bytes(), Platform::Windows).unwrap();
        let versions: Vec<_> = windows.iter().map(|e| e.version.as_str()).collect();
        assert_eq!(versions, vec!["3.1.0", "2.4.9"]);
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let document = r#"[
            {"version": "4.0.0", "linux": "b.zip"},
            {"version": "1.0.0", "linux": "a.zip"},
            {"version": "2.0.0", "linux": "c.zip"}
        ]"#;
        let entries = parse_catalog(document.as_bytes(), Platform::Linux).unwrap();
        let versions: Vec<_> = entries.iter().map(|e| e.version.as_str()).collect();
        assert_eq!(versions, vec!["4.0.0", "1.0.0", "2.0.0"]);
    }

    #[test]
    fn test_parse_duplicate_version_replaces_in_place() {
        let document = r#"[
            {"version": "1.0.0", "linux": "old.zip"},
            {"version": "2.0.0", "linux": "two.zip"},
            {"version": "1.0.0", "linux": "new.zip"}
        ]"#;
        let entries = parse_catalog(document.as_bytes(), Platform::Linux).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, "1.0.0");
        assert_eq!(entries[0].package, "new.zip");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_catalog(b"{\"version\": \"1\"}", Platform::Linux).is_err());
    }

    #[test]
    fn test_select_explicit_version() {
        let entries = vec![entry("3.0.0"), entry("3.1.0"), entry("3.2.0-preview")];
        for e in &entries {
            let selected = select_version(&entries, Some(&e.version)).unwrap();
            assert_eq!(selected.version, e.version);
        }
    }

    #[test]
    fn test_select_default_skips_preview() {
        let entries = vec![entry("3.1.0"), entry("3.2.0-preview")];
        assert_eq!(select_version(&entries, None).unwrap().version, "3.1.0");
    }

    #[test]
    fn test_select_default_takes_last_in_catalog_order() {
        // No sorting: the last stable entry wins even if it is "older"
        let entries = vec![entry("4.0.0"), entry("3.9.0"), entry("4.1.0-preview")];
        assert_eq!(select_version(&entries, None).unwrap().version, "3.9.0");
    }

    #[test]
    fn test_select_unknown_version() {
        let entries = vec![entry("3.1.0")];
        let result = select_version(&entries, Some("nonexistent"));
        assert!(matches!(
            result,
            Err(CiqwError::VersionNotFound { ref version }) if version == "nonexistent"
        ));
    }

    #[test]
    fn test_select_default_only_previews() {
        let entries = vec![entry("3.2.0-preview")];
        assert!(matches!(
            select_version(&entries, None),
            Err(CiqwError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn test_resolver_lists_and_resolves() {
        let remote = FakeRemote::new().with(CATALOG_PATH, CATALOG);
        let resolver = SdkCatalogResolver::new(&remote, Platform::Linux);

        assert_eq!(resolver.list_available().unwrap().len(), 2);
        assert_eq!(resolver.resolve_version(None).unwrap().version, "3.1.0");
        assert_eq!(
            resolver
                .resolve_version(Some("3.2.0-preview"))
                .unwrap()
                .package,
            "connectiq-sdk-lin-3.2.0-preview.zip"
        );
        assert_eq!(remote.request_count(), 3);
    }

    #[test]
    fn test_resolver_catalog_unavailable() {
        let remote = FakeRemote::new();
        let resolver = SdkCatalogResolver::new(&remote, Platform::Linux);
        assert!(matches!(
            resolver.list_available(),
            Err(CiqwError::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_resolver_invalid_document() {
        let remote = FakeRemote::new().with(CATALOG_PATH, "<html>maintenance</html>");
        let resolver = SdkCatalogResolver::new(&remote, Platform::Linux);
        assert!(matches!(
            resolver.list_available(),
            Err(CiqwError::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_resolver_unsupported_platform() {
        let remote = FakeRemote::new().with(CATALOG_PATH, CATALOG);
        let result =
            platform::detect("haiku").map(|p| SdkCatalogResolver::new(&remote, p));
        assert!(matches!(result, Err(CiqwError::PlatformUnsupported { .. })));
        assert_eq!(remote.request_count(), 0);
    }
}
