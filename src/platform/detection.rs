//! Host platform detection

use crate::error::{CiqwError, Result};

use super::Platform;

/// Map an OS identifier (as in `std::env::consts::OS`) to a platform profile
///
/// Matching is by prefix, so identifiers such as `"linux-gnu"` or `"windows"`
/// both resolve.
pub fn detect(os: &str) -> Result<Platform> {
    let os_lower = os.to_lowercase();
    let platform = if os_lower.starts_with("linux") {
        Some(Platform::Linux)
    } else if os_lower.starts_with("windows") {
        Some(Platform::Windows)
    } else if os_lower.starts_with("macos") || os_lower.starts_with("darwin") {
        Some(Platform::Mac)
    } else {
        None
    };

    platform.ok_or_else(|| CiqwError::PlatformUnsupported { os: os.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_linux() {
        assert_eq!(detect("linux").unwrap(), Platform::Linux);
    }

    #[test]
    fn test_detect_mac_variants() {
        assert_eq!(detect("macos").unwrap(), Platform::Mac);
        assert_eq!(detect("darwin").unwrap(), Platform::Mac);
    }

    #[test]
    fn test_detect_windows() {
        assert_eq!(detect("windows").unwrap(), Platform::Windows);
    }

    #[test]
    fn test_detect_unsupported() {
        let result = detect("freebsd");
        assert!(matches!(
            result,
            Err(CiqwError::PlatformUnsupported { ref os }) if os == "freebsd"
        ));
    }

    #[test]
    fn test_detect_current_host() {
        // The test suite only runs on supported hosts
        assert!(detect(std::env::consts::OS).is_ok());
    }
}
