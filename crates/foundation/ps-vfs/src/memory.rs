//! In-memory store

use crate::{FileStore, FileStoreError, StoreResult};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// File store held entirely in memory
///
/// Cloning yields another handle onto the same files, so the host can keep a
/// handle to inspect what a program wrote.
#[derive(Default)]
pub struct MemoryFileStore {
    inner: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryFileStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `files`
    #[must_use]
    pub fn with_files<I, N, T>(files: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let map = files
            .into_iter()
            .map(|(name, text)| (name.into(), text.into()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    fn files(&self) -> StoreResult<RwLockReadGuard<'_, FxHashMap<String, String>>> {
        self.inner.read().map_err(|_| FileStoreError::LockPoisoned)
    }

    fn files_mut(&self) -> StoreResult<RwLockWriteGuard<'_, FxHashMap<String, String>>> {
        self.inner.write().map_err(|_| FileStoreError::LockPoisoned)
    }
}

impl Clone for MemoryFileStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl FileStore for MemoryFileStore {
    fn read(&self, name: &str) -> StoreResult<String> {
        self.files()?
            .get(name)
            .cloned()
            .ok_or_else(|| FileStoreError::NotFound {
                name: name.to_string(),
            })
    }

    fn write(&self, name: &str, text: &str) -> StoreResult<()> {
        self.files_mut()?.insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn append(&self, name: &str, text: &str) -> StoreResult<()> {
        self.files_mut()?
            .entry(name.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    fn list(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self.files()?.keys().cloned().collect())
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.files()?.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing() {
        let store = MemoryFileStore::new();
        assert!(matches!(
            store.read("nope.txt"),
            Err(FileStoreError::NotFound { name }) if name == "nope.txt"
        ));
    }

    #[test]
    fn test_write_overwrites() {
        let store = MemoryFileStore::new();
        store.write("a.txt", "first").unwrap();
        store.write("a.txt", "second").unwrap();
        assert_eq!(store.read("a.txt").unwrap(), "second");
    }

    #[test]
    fn test_append_creates_then_extends() {
        let store = MemoryFileStore::new();
        store.append("log.txt", "one\n").unwrap();
        store.append("log.txt", "two\n").unwrap();
        assert_eq!(store.read("log.txt").unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_clones_share_files() {
        let store = MemoryFileStore::with_files([("x.txt", "hello")]);
        let other = store.clone();
        other.write("y.txt", "world").unwrap();
        let names: Vec<_> = store.list().unwrap().into_iter().collect();
        assert_eq!(names, ["x.txt", "y.txt"]);
        assert!(store.contains("y.txt").unwrap());
    }
}
