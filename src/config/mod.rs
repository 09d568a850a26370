//! Configuration documents
//!
//! Per resource type: the prototype new elements are copied from, where
//! they are created, and which formatters render them. Parsed documents are
//! kept in a [`ConfigurationCache`] owned by the caller.

pub mod cache;
pub mod errors;
pub mod formatter;
pub mod item;
pub mod parser;

pub use cache::ConfigurationCache;
pub use errors::ConfigError;
pub use formatter::{FormatterBinding, FormatterConfiguration};
pub use item::{ConfigurationItem, DetailPageInfo, LazyFolder};
pub use parser::{ConfigurationParser, DEFAULT_MAX_DEPTH};
