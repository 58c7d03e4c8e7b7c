//! Directory-backed image store
//!
//! Images live directly under the output directory as `<page>.png`.

use crate::storage::traits::{AssetStore, StorageError, StorageResult};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Extension used for every stored page image
pub const IMAGE_EXTENSION: &str = "png";

/// Stores page images as files in one directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens a store over an existing directory without creating anything
    pub fn open_existing(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens a store, creating the directory if needed
    pub fn create(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

impl AssetStore for DirectoryStore {
    fn path_for(&self, page: u32) -> PathBuf {
        self.root.join(format!("{}.{}", page, IMAGE_EXTENSION))
    }

    fn put(&mut self, page: u32, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.path_for(page);
        let write_err = |source: std::io::Error| StorageError::Write {
            page,
            path: path.clone(),
            source,
        };

        // Readers only ever see complete images
        let mut file = NamedTempFile::new_in(&self.root).map_err(write_err)?;
        file.write_all(bytes).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        file.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::trace!("Stored page {} ({} bytes) at {}", page, bytes.len(), path.display());
        Ok(path)
    }

    fn open(&self, page: u32) -> StorageResult<Vec<u8>> {
        let path = self.path_for(page);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound { page, path }),
            Err(source) => Err(StorageError::Read { page, path, source }),
        }
    }
}
