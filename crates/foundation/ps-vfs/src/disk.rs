//! Directory-backed store

use crate::{FileStore, FileStoreError, StoreResult};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Component, Path, PathBuf};

/// File store that keeps each file under a root directory
///
/// File names must be plain relative names; anything that would escape the
/// root is rejected as an I/O error.
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Opens a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| FileStoreError::Io {
            name: root.display().to_string(),
            source,
        })?;
        log::debug!("opened disk file store at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of the store
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(FileStoreError::Io {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file name escapes store root"),
            });
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(name: &str, source: io::Error) -> FileStoreError {
    FileStoreError::Io {
        name: name.to_string(),
        source,
    }
}

impl FileStore for DiskFileStore {
    fn read(&self, name: &str) -> StoreResult<String> {
        let path = self.path_of(name)?;
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => FileStoreError::NotFound {
                name: name.to_string(),
            },
            _ => io_error(name, source),
        })
    }

    fn write(&self, name: &str, text: &str) -> StoreResult<()> {
        let path = self.path_of(name)?;
        fs::write(path, text).map_err(|source| io_error(name, source))
    }

    fn append(&self, name: &str, text: &str) -> StoreResult<()> {
        let path = self.path_of(name)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| io_error(name, source))?;
        file.write_all(text.as_bytes())
            .map_err(|source| io_error(name, source))
    }

    fn list(&self) -> StoreResult<BTreeSet<String>> {
        let root = self.root.display().to_string();
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.root).map_err(|source| io_error(&root, source))? {
            let entry = entry.map_err(|source| io_error(&root, source))?;
            let is_file = entry
                .file_type()
                .map_err(|source| io_error(&root, source))?
                .is_file();
            if is_file {
                names.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.path_of(name)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::open(dir.path()).unwrap();
        store.write("scores.txt", "10\n").unwrap();
        store.append("scores.txt", "20\n").unwrap();
        assert_eq!(store.read("scores.txt").unwrap(), "10\n20\n");
        assert!(store.list().unwrap().contains("scores.txt"));
    }

    #[test]
    fn test_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.read("absent.txt"),
            Err(FileStoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.write("../outside.txt", "x"),
            Err(FileStoreError::Io { .. })
        ));
        assert!(matches!(store.read(""), Err(FileStoreError::Io { .. })));
    }
}
