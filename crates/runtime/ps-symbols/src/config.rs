//! Runtime configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! enforce_constants = true
//!
//! [files]
//! backend = "disk"
//! root = "pseudo-files"
//! ```

use ps_vfs::{DiskFileStore, FileStore, FileStoreError, MemoryFileStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use toml::de;

/// Errors raised while loading configuration or building its file store
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid
    #[error("invalid config: {0}")]
    Parse(#[from] de::Error),

    /// The disk backend was selected without a root directory
    #[error("disk file backend requires a `root` directory")]
    MissingRoot,

    /// The configured file store could not be opened
    #[error(transparent)]
    Store(#[from] FileStoreError),
}

/// Backing medium for pseudocode files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Files live only for the lifetime of the process
    #[default]
    Memory,
    /// Files live under a directory
    Disk,
}

/// File store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Backing medium
    pub backend: StoreBackend,
    /// Root directory for the disk backend
    pub root: Option<PathBuf>,
}

impl FilesConfig {
    /// Build the configured store
    ///
    /// # Errors
    ///
    /// Returns `MissingRoot` for a disk backend without `root`, or the store
    /// error if the root directory cannot be created.
    pub fn open_store(&self) -> Result<Box<dyn FileStore>, ConfigError> {
        match self.backend {
            StoreBackend::Memory => Ok(Box::new(MemoryFileStore::new())),
            StoreBackend::Disk => {
                let root = self.root.as_ref().ok_or(ConfigError::MissingRoot)?;
                Ok(Box::new(DiskFileStore::open(root)?))
            }
        }
    }
}

/// Settings for an [`crate::Environment`] and its file store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Reject assignments to constants
    pub enforce_constants: bool,
    /// File store settings
    pub files: FilesConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enforce_constants: true,
            files: FilesConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from TOML text; missing keys take defaults
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded runtime config from {}", path.display());
        Ok(config)
    }
}
