//! Access to the vendor's download service
//!
//! The catalog resolver, the SDK installer and the SDK manager installer all
//! talk to the service through the [`Remote`] trait. [`HttpRemote`] is the
//! real service; [`MirrorRemote`] serves the same layout from a local
//! directory, which is what `file://` base URLs select.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::progress::DownloadProgress;

/// Failure to fetch a resource from the service
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct FetchError {
    /// Full URL (or mirror path) of the resource
    pub url: String,
    /// Human-readable cause
    pub reason: String,
}

impl FetchError {
    fn new(url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// A download service addressed by paths relative to its base
pub trait Remote {
    /// Full URL of a resource, for messages
    fn url(&self, path: &str) -> String;

    /// Fetch a resource into memory
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetch a resource into `dest`
    ///
    /// The content is written to a temporary file next to `dest` and renamed
    /// into place once complete, so `dest` only ever exists in full.
    fn download(&self, path: &str, dest: &Path) -> Result<u64, FetchError> {
        let bytes = self.fetch(path)?;
        crate::common::fs::write_atomic(dest, &bytes)
            .map_err(|e| FetchError::new(self.url(path), e))?;
        Ok(bytes.len() as u64)
    }
}

/// Select the remote for a base URL
///
/// `file://` URLs and plain paths select a local mirror; anything else is
/// fetched over HTTP.
pub fn for_base_url(base_url: &str) -> Result<Box<dyn Remote>, FetchError> {
    if let Some(path) = base_url.strip_prefix("file://") {
        return Ok(Box::new(MirrorRemote::new(path)));
    }
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return Ok(Box::new(HttpRemote::new(base_url)?));
    }
    Ok(Box::new(MirrorRemote::new(base_url)))
}

/// The download service over HTTP
pub struct HttpRemote {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("ciqw/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::new(base_url, e))?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let url = self.url(path);
        debug!("Sending HTTP GET request to {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::new(&url, e))?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);
        if !status.is_success() {
            return Err(FetchError::new(url, format!("server returned {status}")));
        }

        Ok(response)
    }
}

impl Remote for HttpRemote {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(path)?;
        let bytes = response
            .bytes()
            .map_err(|e| FetchError::new(self.url(path), e))?;
        Ok(bytes.to_vec())
    }

    fn download(&self, path: &str, dest: &Path) -> Result<u64, FetchError> {
        let url = self.url(path);
        info!("Downloading '{}'", url);

        let mut response = self.get(path)?;
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| FetchError::new(&url, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| FetchError::new(&url, e))?;
        let progress = DownloadProgress::new(response.content_length(), file_label(dest));

        let mut buffer = [0u8; 64 * 1024];
        let mut total = 0u64;
        loop {
            let read = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) => {
                    progress.abandon();
                    return Err(FetchError::new(&url, e));
                }
            };
            tmp.write_all(&buffer[..read])
                .map_err(|e| FetchError::new(&url, e))?;
            total += read as u64;
            progress.advance(read as u64);
        }
        progress.finish();

        tmp.persist(dest)
            .map_err(|e| FetchError::new(&url, e.error))?;
        debug!("Downloaded {} bytes to {}", total, dest.display());
        Ok(total)
    }
}

/// A local directory laid out like the download service
pub struct MirrorRemote {
    root: PathBuf,
}

impl MirrorRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Remote for MirrorRemote {
    fn url(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let file = self.root.join(path);
        debug!("Reading mirror file {}", file.display());
        fs::read(&file).map_err(|e| FetchError::new(file.display().to_string(), e))
    }
}

fn file_label(dest: &Path) -> String {
    dest.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory remote for unit tests

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Serves fixed resources and records every request
    #[derive(Default)]
    pub struct FakeRemote {
        resources: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeRemote {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
            self.resources.insert(path.to_string(), body.into());
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Remote for FakeRemote {
        fn url(&self, path: &str) -> String {
            format!("fake://{path}")
        }

        fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.borrow_mut().push(path.to_string());
            self.resources
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::new(self.url(path), "server returned 404 Not Found"))
        }
    }
}
