//! Where overlay datasets come from.

use crate::{prelude::HashMap, MapError, Result};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Fetches the raw bytes of a named dataset
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Datasets held in memory, keyed by name.
///
/// Counts fetches so callers can verify a dataset is not loaded twice.
#[derive(Debug, Default)]
pub struct MemoryDatasetSource {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl MemoryDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(name.into(), bytes.into());
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for MemoryDatasetSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let entries = self
            .entries
            .lock()
            .map_err(|e| MapError::Layer(format!("dataset store poisoned: {e}")))?;
        entries.get(name).cloned().ok_or_else(|| MapError::Dataset {
            name: name.to_string(),
            reason: "not found".to_string(),
        })
    }
}

/// Reads datasets from a directory
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    base: std::path::PathBuf,
}

#[cfg(feature = "tokio-runtime")]
impl FileDatasetSource {
    pub fn new(base: impl Into<std::path::PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[cfg(feature = "tokio-runtime")]
#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.base.join(name);
        log::debug!("reading dataset {}", path.display());
        Ok(tokio::fs::read(path).await?)
    }
}

/// Fetches datasets relative to a base URL
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    base_url: String,
    client: reqwest::Client,
    timeout: std::time::Duration,
}

#[cfg(feature = "http")]
impl HttpDatasetSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(name))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MapError::Dataset {
                name: name.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
