//! Where model bytes come from

use async_trait::async_trait;
use delaycast_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// A location-addressed provider of raw model bytes
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Read the bytes stored at `location`
    async fn read(&self, location: &str) -> Result<Vec<u8>>;
}

/// Reads models from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsModelSource {
    base_dir: Option<PathBuf>,
}

impl FsModelSource {
    /// Resolve locations relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `dir`
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Path a location resolves to
    pub fn resolve(&self, location: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl ModelSource for FsModelSource {
    async fn read(&self, location: &str) -> Result<Vec<u8>> {
        if location.trim().is_empty() {
            return Err(Error::io("model path is empty"));
        }
        let path = self.resolve(location);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::io(format!("{}: '{}'", e, path.display())))
    }
}

/// Serves models from memory, keyed by location
#[derive(Default)]
pub struct MemoryModelSource {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryModelSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a location
    pub fn insert(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.write().insert(location.into(), bytes.into());
    }
}

#[async_trait]
impl ModelSource for MemoryModelSource {
    async fn read(&self, location: &str) -> Result<Vec<u8>> {
        self.entries
            .read()
            .get(location)
            .cloned()
            .ok_or_else(|| Error::io(format!("no model registered at '{}'", location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn fs_source_reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"model bytes").unwrap();

        let source = FsModelSource::new();
        let bytes = source.read(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"model bytes");
    }

    #[tokio::test]
    async fn fs_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsModelSource::with_base_dir(dir.path());
        let err = source.read("modelv2.json").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("modelv2.json"));

        assert!(matches!(source.read("  ").await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn memory_source_serves_registered_bytes() {
        let source = MemoryModelSource::new();
        source.insert("models/a", b"abc".to_vec());
        assert_eq!(source.read("models/a").await.unwrap(), b"abc");
        assert!(source.read("models/b").await.is_err());
    }
}
