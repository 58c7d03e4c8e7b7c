/// Walk state definitions for the page traversal loop
///
/// This module defines every state the walker passes through while it moves
/// from one viewer page to the next, and which moves between them are legal.
use std::fmt;

/// Represents the current step of the traversal loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkState {
    // ===== Active States =====
    /// Entry URL accepted, nothing requested yet
    Init,

    /// Requesting the current page's markup
    FetchPage,

    /// Reading the total page count from the first page
    ProbingTotal,

    /// Locating and requesting the current page's image
    FetchImage,

    /// Writing the fetched image to the asset store
    Persist,

    /// Looking for the next page link
    Advance,

    // ===== Terminal States =====
    /// End of document reached cleanly
    Done,

    /// Stopped by an unrecoverable error
    Failed,
}

impl WalkState {
    /// Returns true if this is a terminal state (the loop has stopped)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// Any active state may fail. Probing only ever happens between the first
    /// page fetch and the first image fetch.
    pub fn can_transition_to(&self, next: WalkState) -> bool {
        if next == Self::Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Self::Init, Self::FetchPage)
                | (Self::FetchPage, Self::ProbingTotal)
                | (Self::FetchPage, Self::FetchImage)
                | (Self::ProbingTotal, Self::FetchImage)
                | (Self::FetchImage, Self::Persist)
                | (Self::FetchImage, Self::Done)
                | (Self::Persist, Self::Advance)
                | (Self::Advance, Self::FetchPage)
                | (Self::Advance, Self::Done)
        )
    }

    /// Short lowercase name used in trace output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::FetchPage => "fetch_page",
            Self::ProbingTotal => "probing_total",
            Self::FetchImage => "fetch_image",
            Self::Persist => "persist",
            Self::Advance => "advance",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
