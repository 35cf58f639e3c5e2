//! Client-side content synchronization for the Rainbow blogging platform.
//!
//! Three pieces keep the client consistent with the API: [`AuthorResolver`]
//! hydrates author identities with one request per distinct author,
//! [`BookmarkCoordinator`] flips bookmark flags and broadcasts the confirmed
//! value to every view, and [`SearchFilterEngine`] filters an in-memory
//! collection by scope. [`ContentListView`] and [`BookmarksView`] compose them.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;

pub use config::Config;
pub use error::{ClientError, Result};
pub use models::{Author, AuthorCache, ContentRecord, ContentUpdate, SearchQuery, SearchScope};
pub use services::{
    AuthorResolver, BlogApi, BookmarkCoordinator, BookmarkEvent, BookmarkPhase, HttpBlogApi,
    SearchFilterEngine, SharedApi, ToggleOutcome,
};
pub use state::{Session, ViewContext};
pub use utils::date::DateFormatter;
pub use views::{BookmarkSink, BookmarksView, ContentListView, LoadState};
