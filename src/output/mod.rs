//! Output module for producing the final artifact
//!
//! This module provides:
//! - Progress reporting while pages are saved
//! - Assembly of the saved page images into one PDF document

mod assembler;
mod progress;

pub use assembler::{assemble_directory, AssembleError, AssembleResult, Artifact, Assembler};
pub use progress::{reporter_for, NoopProgress, ProgressBarReporter, ProgressReporter};

use crate::config::{Config, OutputFormat};
use crate::storage::DirectoryStore;
use crate::traversal::WalkOutcome;
use crate::ManualError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Produces the configured artifact from a finished walk
///
/// In PNG mode the saved images already are the artifact. In PDF mode the
/// images `first_page..=last_page` are assembled into the configured
/// document path.
///
/// # Returns
///
/// * `Ok(Some(Artifact))` - The artifact
/// * `Ok(None)` - The walk saved no images
/// * `Err(ManualError)` - Assembly failed; no document was written
pub fn assemble_outcome(
    config: &Config,
    outcome: &WalkOutcome,
) -> Result<Option<Artifact>, ManualError> {
    assemble_outcome_with_interrupt(config, outcome, Arc::new(AtomicBool::new(false)))
}

/// Same as [`assemble_outcome`], but gives up between pages once
/// `interrupted` is set, failing with [`AssembleError::Interrupted`]
pub fn assemble_outcome_with_interrupt(
    config: &Config,
    outcome: &WalkOutcome,
    interrupted: Arc<AtomicBool>,
) -> Result<Option<Artifact>, ManualError> {
    let (first_page, last_page) = match outcome.page_range() {
        Some(range) => range,
        None => {
            tracing::warn!("No page images were saved, nothing to assemble");
            return Ok(None);
        }
    };

    let directory = config.output.directory.clone();

    match config.output.format {
        OutputFormat::Png => Ok(Some(Artifact::ImageSet {
            directory,
            first_page,
            last_page,
        })),
        OutputFormat::Pdf => {
            let store = DirectoryStore::open_existing(directory);
            let assembler = Assembler::new(config.output.quality)?.with_interrupt(interrupted);
            let artifact = assembler.assemble(
                &store,
                first_page,
                last_page,
                &config.output.document_path(),
            )?;
            Ok(Some(artifact))
        }
    }
}
