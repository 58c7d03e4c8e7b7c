//! State management module
//!
//! This module contains the traversal state machine and the cursor the
//! walker carries from page to page.

mod sequence_state;
mod walk_state;

pub use sequence_state::SequenceState;
pub use walk_state::WalkState;
