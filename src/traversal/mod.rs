//! Traversal module for walking a paginated viewer
//!
//! This module contains the core download logic, including:
//! - HTTP fetching of page markup and page images
//! - Locating the total count, page image and next link in the markup
//! - The page-by-page walk itself

mod fetcher;
mod locator;
mod walker;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use locator::{EndReason, NextPage, PageLocator};
pub use walker::{WalkOutcome, Walker};

use crate::config::Config;
use crate::output::{assemble_outcome, reporter_for, Artifact};
use crate::storage::DirectoryStore;
use crate::ManualError;

/// Walks a viewer from `entry`, saving every page image
///
/// Images are written to the configured output directory, which is created
/// if needed. Nothing is assembled; see [`download`] for the full run.
pub async fn walk(config: &Config, entry: &str) -> Result<WalkOutcome, ManualError> {
    let store = DirectoryStore::create(&config.output.directory)?;
    let mut walker = Walker::new(config, store, reporter_for(config))?;

    tracing::info!(
        "Downloading {} into {}",
        entry,
        config.output.directory.display()
    );

    walker.run(entry).await
}

/// Runs a complete download
///
/// This is the main entry point for library users. It will:
/// 1. Walk the viewer and save every page image
/// 2. Assemble the images into a document when the format is PDF
///
/// # Returns
///
/// * `Ok(Some(Artifact))` - The produced artifact
/// * `Ok(None)` - The viewer had no page images, nothing was produced
/// * `Err(ManualError)` - The walk or the assembly failed
pub async fn download(config: &Config, entry: &str) -> Result<Option<Artifact>, ManualError> {
    let outcome = walk(config, entry).await?;
    assemble_outcome(config, &outcome)
}
