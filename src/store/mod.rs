//! One store per entity type, each the single owner of its persisted list.
//!
//! Every mutation computes the new full list in memory and immediately
//! writes it back under the store's key; derived views are pure reads over
//! the in-memory list.

pub mod calendar;
pub mod mood;
pub mod todo;

use thiserror::Error;

pub use calendar::CalendarStore;
pub use mood::MoodStore;
pub use todo::TodoStore;

/// Validation failures surfaced to the user; the operation aborts without
/// mutating the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("unknown mood '{0}'")]
    UnknownMood(String),
    #[error("unknown priority '{0}'")]
    UnknownPriority(String),
}
