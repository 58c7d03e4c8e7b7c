//! Storage traits and error types
//!
//! This module defines the trait interface for page image stores and
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No image stored for page {page} at {}", path.display())]
    NotFound { page: u32, path: PathBuf },

    #[error("Failed to write image for page {page} to {}: {source}", path.display())]
    Write {
        page: u32,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read image for page {page} from {}: {source}", path.display())]
    Read {
        page: u32,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page image stores
///
/// Images are keyed purely by page number. A store has a single writer and
/// every `put` either fully replaces the page's image or leaves it untouched.
pub trait AssetStore {
    /// Path at which the image for `page` lives (whether or not it exists yet)
    fn path_for(&self, page: u32) -> PathBuf;

    /// Writes or overwrites the image for `page`
    ///
    /// # Returns
    ///
    /// The path the image was written to
    fn put(&mut self, page: u32, bytes: &[u8]) -> StorageResult<PathBuf>;

    /// Reads the stored image for `page`
    ///
    /// Fails with [`StorageError::NotFound`] when nothing is stored.
    fn open(&self, page: u32) -> StorageResult<Vec<u8>>;
}
