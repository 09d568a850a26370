//! Bookmark Index Module
//!
//! Flat lookup from a structural position in a page document to the DOM
//! node holding its value, keyed per locale.
//!
//! ```text
//! BookmarkIndex
//! └── (BookmarkPath, Locale) -> Bookmark { node, structural }
//! ```

pub mod bookmarks;

pub use bookmarks::{Bookmark, BookmarkIndex, BookmarkPath};
