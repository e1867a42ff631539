//! Raw key-value backends
//!
//! A backend stores opaque string blobs under string keys. All mutation is
//! whole-value replacement; `remove` is idempotent.

use crate::error::StoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store over whole-collection blobs
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the blob under `key`, or `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the blob under `key`; removing an absent key is a no-op
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory backend
///
/// The mutex serializes access from the reconciliation task and foreground
/// operations; individual get/set calls never hold it across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().remove(key);
        Ok(())
    }
}

/// File-backed backend: one `<key>.json` file per key under a root directory
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    /// Returns `StoreError::Io` when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Directory the store writes into
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| StoreError::io(path, e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("codes").unwrap().is_none());

        store.set("codes", "[]").unwrap();
        assert_eq!(store.get("codes").unwrap().as_deref(), Some("[]"));

        store.remove("codes").unwrap();
        assert!(store.get("codes").unwrap().is_none());
    }

    #[test]
    fn memory_store_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.get("codes").unwrap().is_none());
        store.set("codes", r#"[{"code":"ABC123"}]"#).unwrap();
        assert_eq!(
            store.get("codes").unwrap().as_deref(),
            Some(r#"[{"code":"ABC123"}]"#)
        );
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("reviews", "[1,2,3]").unwrap();
        }
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("reviews").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn file_store_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.remove("never-written").unwrap();
    }
}
