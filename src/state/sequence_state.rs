//! Traversal cursor owned by the walker

use crate::url::PageReference;
use url::Url;

/// Mutable traversal cursor
///
/// Only the walker holds one. The total page count is probed at most once;
/// after that [`SequenceState::record_total`] is a no-op.
#[derive(Debug, Clone)]
pub struct SequenceState {
    site_root: Url,
    current: PageReference,
    first_page: u32,
    total_pages: Option<u32>,
    total_probed: bool,
    last_persisted: Option<u32>,
    pages_persisted: u32,
}

impl SequenceState {
    /// Creates the cursor at the entry page
    pub fn new(site_root: Url, entry: PageReference) -> Self {
        let first_page = entry.page_number();
        Self {
            site_root,
            current: entry,
            first_page,
            total_pages: None,
            total_probed: false,
            last_persisted: None,
            pages_persisted: 0,
        }
    }

    pub fn site_root(&self) -> &Url {
        &self.site_root
    }

    pub fn current(&self) -> &PageReference {
        &self.current
    }

    pub fn current_page(&self) -> u32 {
        self.current.page_number()
    }

    pub fn first_page(&self) -> u32 {
        self.first_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn total_probed(&self) -> bool {
        self.total_probed
    }

    pub fn last_persisted(&self) -> Option<u32> {
        self.last_persisted
    }

    pub fn pages_persisted(&self) -> u32 {
        self.pages_persisted
    }

    /// Records the outcome of the one and only total count probe
    ///
    /// Returns false if the total had already been probed.
    pub fn record_total(&mut self, total: Option<u32>) -> bool {
        if self.total_probed {
            return false;
        }
        self.total_probed = true;
        self.total_pages = total;
        true
    }

    /// Records that the current page's image has been written
    pub fn record_persisted(&mut self) {
        self.last_persisted = Some(self.current_page());
        self.pages_persisted += 1;
    }

    /// Moves the cursor to the next page
    pub fn advance(&mut self, next: PageReference) {
        self.current = next;
    }
}
