//! Page walker - main traversal loop
//!
//! This module contains the loop that moves through the viewer one page at a
//! time:
//! - Fetching the current page's markup
//! - Probing the total page count on the first page
//! - Fetching and persisting the page image
//! - Following the page's own "next" link until the document ends

use crate::config::Config;
use crate::output::ProgressReporter;
use crate::state::{SequenceState, WalkState};
use crate::storage::AssetStore;
use crate::traversal::locator::{NextPage, PageLocator};
use crate::traversal::{build_http_client, fetch_url};
use crate::url::{resolve, site_root, PageReference};
use crate::ManualError;
use reqwest::Client;
use scraper::Html;

/// Summary of a finished walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Page number of the entry page
    pub first_page: u32,

    /// Last page whose image was persisted (None if none was)
    pub last_page: Option<u32>,

    /// Total page count reported by the viewer
    pub total_pages: Option<u32>,

    /// Number of images persisted
    pub pages_saved: u32,
}

impl WalkOutcome {
    /// Inclusive range of persisted page numbers, if any page was saved
    pub fn page_range(&self) -> Option<(u32, u32)> {
        self.last_page.map(|last| (self.first_page, last))
    }
}

/// What the markup of one page says
enum PageStep {
    /// No page image: the document has ended
    EndOfDocument,
    /// A page image to fetch, and what follows it
    Image { src: String, next: NextPage },
}

/// Walks a viewer from an entry page to the end of the document
pub struct Walker<S: AssetStore> {
    client: Client,
    locator: PageLocator,
    store: S,
    progress: Box<dyn ProgressReporter>,
    page_param: String,
    state: WalkState,
}

impl<S: AssetStore> Walker<S> {
    /// Creates a new walker
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `store` - Where page images are written
    /// * `progress` - Receives a notification for every saved page
    pub fn new(
        config: &Config,
        store: S,
        progress: Box<dyn ProgressReporter>,
    ) -> Result<Self, ManualError> {
        let client = build_http_client(&config.http)?;
        let locator = PageLocator::new(&config.viewer)?;

        Ok(Self {
            client,
            locator,
            store,
            progress,
            page_param: config.viewer.page_param.clone(),
            state: WalkState::Init,
        })
    }

    /// Current state of the traversal loop
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Runs the traversal loop from `entry` until the document ends
    ///
    /// Any fetch or extraction failure stops the walk immediately. Images
    /// persisted before the failure stay where they are.
    pub async fn run(&mut self, entry: &str) -> Result<WalkOutcome, ManualError> {
        self.state = WalkState::Init;

        match self.walk_pages(entry).await {
            Ok(outcome) => {
                self.progress.on_finish();
                Ok(outcome)
            }
            Err(e) => {
                if !self.state.is_terminal() {
                    self.state = WalkState::Failed;
                }
                self.progress.on_abandon();
                Err(e)
            }
        }
    }

    async fn walk_pages(&mut self, entry: &str) -> Result<WalkOutcome, ManualError> {
        let entry = PageReference::parse_entry(entry, &self.page_param)?;
        let root = site_root(entry.url())?;
        tracing::debug!("Host: {}", root);

        let mut sequence = SequenceState::new(root, entry);

        loop {
            self.transition(WalkState::FetchPage)?;
            let page_url = sequence.current().url().clone();
            tracing::debug!("Page: {}", page_url);

            let body = fetch_url(&self.client, &page_url)
                .await
                .into_body(&page_url)?;
            let markup = String::from_utf8_lossy(&body);

            let (src, next) = match self.inspect_page(&markup, &mut sequence)? {
                PageStep::EndOfDocument => {
                    tracing::debug!("No page image on {}, end of document", page_url);
                    break;
                }
                PageStep::Image { src, next } => (src, next),
            };

            let image_url = resolve(sequence.site_root(), &src)?;
            tracing::debug!("Image: {}", image_url);

            let image = fetch_url(&self.client, &image_url)
                .await
                .into_body(&image_url)?;

            self.transition(WalkState::Persist)?;
            let page = sequence.current_page();
            let path = self.store.put(page, &image)?;
            sequence.record_persisted();
            tracing::debug!("Saved page {} to {}", page, path.display());
            self.progress.on_page_saved(page, sequence.total_pages());

            self.transition(WalkState::Advance)?;
            match next {
                NextPage::End(reason) => {
                    tracing::debug!("Page {} is the last page ({})", page, reason);
                    break;
                }
                NextPage::Page(reference) => {
                    let next_page = reference.page_number();
                    if next_page <= page {
                        return Err(ManualError::NonIncreasingPage {
                            current: page,
                            next: next_page,
                        });
                    }
                    sequence.advance(reference);
                }
            }
        }

        self.transition(WalkState::Done)?;

        let outcome = WalkOutcome {
            first_page: sequence.first_page(),
            last_page: sequence.last_persisted(),
            total_pages: sequence.total_pages(),
            pages_saved: sequence.pages_persisted(),
        };

        tracing::info!(
            "Walk finished: {} pages saved (first {}, last {:?}, viewer reports {:?})",
            outcome.pages_saved,
            outcome.first_page,
            outcome.last_page,
            outcome.total_pages
        );

        Ok(outcome)
    }

    /// Reads one page's markup: total count (first page only), image, next link
    ///
    /// The next link is only looked at when the page has an image.
    fn inspect_page(
        &mut self,
        markup: &str,
        sequence: &mut SequenceState,
    ) -> Result<PageStep, ManualError> {
        let document = Html::parse_document(markup);

        if !sequence.total_probed() {
            self.transition(WalkState::ProbingTotal)?;
            let total = self.locator.total_page_count(&document);
            sequence.record_total(total);

            match total {
                Some(total) => {
                    tracing::debug!("Total pages: {}", total);
                    self.progress.on_start(total);
                }
                None => {
                    return Err(ManualError::Structure {
                        url: sequence.current().to_string(),
                        message: "total page count widget is missing or unreadable".to_string(),
                    });
                }
            }
        }

        self.transition(WalkState::FetchImage)?;
        let src = match self.locator.image_reference(&document) {
            Some(src) => src,
            None => return Ok(PageStep::EndOfDocument),
        };

        let next = self.locator.next_page(&document, sequence.site_root());
        Ok(PageStep::Image { src, next })
    }

    fn transition(&mut self, next: WalkState) -> Result<(), ManualError> {
        if !self.state.can_transition_to(next) {
            return Err(ManualError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Walk state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}
