//! Storage module for persisting page images
//!
//! This module handles writing each fetched page image to disk and reading
//! it back for assembly.

mod directory;
mod traits;

pub use directory::{DirectoryStore, IMAGE_EXTENSION};
pub use traits::{AssetStore, StorageError, StorageResult};
