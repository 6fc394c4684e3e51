//! Virtual file store backing pseudocode file handles
//!
//! Programs address files purely by name. The runtime never touches the host
//! file system directly; it goes through a [`FileStore`], so the backing can be
//! an in-memory map (tests, sandboxed hosts) or a directory on disk.

mod disk;
mod memory;

pub use disk::DiskFileStore;
pub use memory::MemoryFileStore;

use std::collections::BTreeSet;
use std::io;

/// Errors raised by a file store
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// No content has ever been stored under this name
    #[error("file '{name}' not found")]
    NotFound {
        /// Name of the missing file
        name: String,
    },

    /// The backing medium failed
    #[error("I/O error on file '{name}': {source}")]
    Io {
        /// Name of the file being accessed
        name: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A previous holder of the store lock panicked
    #[error("file store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, FileStoreError>;

/// Persistent named text blobs
///
/// All methods take `&self`; implementations handle their own interior
/// mutability so one store can be shared between the host and every open
/// file handle.
pub trait FileStore {
    /// Full content stored under `name`
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::NotFound`] if nothing is stored under `name`.
    fn read(&self, name: &str) -> StoreResult<String>;

    /// Create or overwrite `name` with `text`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the write.
    fn write(&self, name: &str, text: &str) -> StoreResult<()>;

    /// Append `text` to `name`, creating it when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the write.
    fn append(&self, name: &str, text: &str) -> StoreResult<()>;

    /// Names of every stored file
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be enumerated.
    fn list(&self) -> StoreResult<BTreeSet<String>>;

    /// Whether `name` has content
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be enumerated.
    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.list()?.contains(name))
    }
}

impl<S: FileStore + ?Sized> FileStore for Box<S> {
    fn read(&self, name: &str) -> StoreResult<String> {
        (**self).read(name)
    }

    fn write(&self, name: &str, text: &str) -> StoreResult<()> {
        (**self).write(name, text)
    }

    fn append(&self, name: &str, text: &str) -> StoreResult<()> {
        (**self).append(name, text)
    }

    fn list(&self) -> StoreResult<BTreeSet<String>> {
        (**self).list()
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        (**self).contains(name)
    }
}
