pub mod author;
pub mod content;
pub mod response;
pub mod search;

pub use author::{Author, AuthorCache};
pub use content::{ContentRecord, ContentUpdate};
pub use search::{SearchQuery, SearchScope};
