//! Object storage for raw uploads.
//!
//! Uploaded files are archived before indexing so the original bytes
//! survive re-chunking and re-embedding. The [`ObjectStore`] trait is the
//! seam; [`FsObjectStore`] keeps objects under a local root directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur in object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object key is empty, absolute, or escapes the storage root.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// An underlying filesystem error.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Put/get of raw bytes keyed by a relative path.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under the given key, replacing any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Fetch the bytes stored under the given key.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// An [`ObjectStore`] backed by a local directory.
///
/// Keys map to paths relative to the root; parent directories are created
/// on demand.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root, rejecting traversal.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".to_string()));
        }
        let relative = Path::new(key);
        let escapes =
            relative.components().any(|c| !matches!(c, Component::Normal(_)));
        if relative.is_absolute() || escapes {
            return Err(StorageError::InvalidKey(format!(
                "key '{key}' must be a relative path without '..'"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(key, size = bytes.len(), "stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::read(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store.put("uploads/notes.txt", b"hello").await.unwrap();
        let bytes = store.get("uploads/notes.txt").await.unwrap();

        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn put_overwrites_existing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store.put("uploads/notes.txt", b"first").await.unwrap();
        store.put("uploads/notes.txt", b"second").await.unwrap();

        assert_eq!(store.get("uploads/notes.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        assert!(matches!(
            store.put("../escape.txt", b"x").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.put("/etc/passwd", b"x").await, Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.put("", b"x").await, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn missing_object_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        assert!(matches!(store.get("uploads/absent.txt").await, Err(StorageError::Io(_))));
    }
}
