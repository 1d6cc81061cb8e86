//! Signing key generation
//!
//! Applications are signed with a 4096-bit RSA key in PKCS#8 DER form. The
//! key is produced with the `openssl` command: first a PEM key next to the
//! requested path, then its DER conversion.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{CiqwError, Result};

/// Key size in bits
const KEY_BITS: &str = "4096";

/// PEM file generated alongside a DER key
pub fn pem_path(der: &Path) -> PathBuf {
    der.with_extension("pem")
}

fn genrsa_args(pem: &Path) -> Vec<OsString> {
    vec![
        "genrsa".into(),
        "-out".into(),
        pem.as_os_str().to_owned(),
        KEY_BITS.into(),
    ]
}

fn pkcs8_args(pem: &Path, der: &Path) -> Vec<OsString> {
    vec![
        "pkcs8".into(),
        "-topk8".into(),
        "-inform".into(),
        "PEM".into(),
        "-outform".into(),
        "DER".into(),
        "-in".into(),
        pem.as_os_str().to_owned(),
        "-out".into(),
        der.as_os_str().to_owned(),
        "-nocrypt".into(),
    ]
}

fn openssl(args: &[OsString], key: &Path) -> Result<()> {
    let failed = |reason: String| CiqwError::KeyGenerationFailed {
        path: key.display().to_string(),
        reason,
    };

    let status = Command::new("openssl")
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| failed(format!("could not run openssl: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(failed(format!("openssl exited with {status}")))
    }
}

/// Generate a signing key at `der`
///
/// An existing key is kept unless `force` is set. Returns whether a key was
/// written.
pub fn generate(der: &Path, force: bool) -> Result<bool> {
    if der.exists() && !force {
        info!("Signing key '{}' already exists.", der.display());
        return Ok(false);
    }

    if let Some(parent) = der.parent() {
        fs::create_dir_all(parent)?;
    }

    let pem = pem_path(der);
    info!("Generating signing key '{}'.", der.display());
    openssl(&genrsa_args(&pem), der)?;
    openssl(&pkcs8_args(&pem, der), der)?;

    if !der.is_file() {
        return Err(CiqwError::KeyGenerationFailed {
            path: der.display().to_string(),
            reason: "openssl produced no key".to_string(),
        });
    }
    Ok(true)
}

/// Generate the signing key if it does not exist yet
pub fn ensure_signing_key(der: &Path) -> Result<()> {
    if !der.exists() {
        generate(der, false)?;
    }
    Ok(())
}
