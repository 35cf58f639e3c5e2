pub mod api;
pub mod author;
pub mod bookmark;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{BlogApi, HttpBlogApi, SharedApi};
pub use author::AuthorResolver;
pub use bookmark::{BookmarkCoordinator, BookmarkEvent, BookmarkPhase, ToggleOutcome};
pub use search::SearchFilterEngine;
