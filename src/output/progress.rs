//! Progress reporting for download runs
//!
//! The walker reports every saved page to a [`ProgressReporter`]. On a
//! terminal the default reporter draws a bar; in verbose mode the bar is
//! replaced by the walker's own trace lines.

use crate::config::Config;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives page events from the walker
///
/// All methods have default no-op implementations so implementors only
/// override what they care about.
pub trait ProgressReporter: Send {
    /// Called once, after the total page count has been read
    fn on_start(&mut self, total_pages: u32) {
        let _ = total_pages;
    }

    /// Called after the image for `page` has been persisted
    fn on_page_saved(&mut self, page: u32, total_pages: Option<u32>) {
        let _ = (page, total_pages);
    }

    /// Called when the walk reaches the end of the document
    fn on_finish(&mut self) {}

    /// Called when the walk stops on an error
    fn on_abandon(&mut self) {}
}

/// A reporter that ignores every event
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {}

/// Terminal progress bar showing the current page against the total
///
/// The bar only appears once the total page count is known.
#[derive(Default)]
pub struct ProgressBarReporter {
    bar: Option<ProgressBar>,
}

impl ProgressBarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn on_start(&mut self, total_pages: u32) {
        let bar = ProgressBar::new(u64::from(total_pages));
        bar.set_style(
            ProgressStyle::with_template(
                "\t{msg}: [{bar:50}] {percent}% done ({pos}/{len})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("██░"),
        );
        bar.set_message("Downloading");
        self.bar = Some(bar);
    }

    fn on_page_saved(&mut self, page: u32, _total_pages: Option<u32>) {
        if let Some(bar) = &self.bar {
            let position = u64::from(page);
            // Position never exceeds the bar length
            if bar.length().is_some_and(|len| position > len) {
                bar.set_length(position);
            }
            bar.set_position(position);
        }
    }

    fn on_finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("Downloaded");
        }
    }

    fn on_abandon(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

/// Picks the reporter matching the configured verbosity
pub fn reporter_for(config: &Config) -> Box<dyn ProgressReporter> {
    if config.is_verbose() {
        Box::new(NoopProgress)
    } else {
        Box::new(ProgressBarReporter::new())
    }
}
