//! containerpage - Locale-variant container page documents
//!
//! Layers, bottom up:
//! - `core`, `reader`: byte-level scanning and a zero-copy pull parser
//! - `dom`: owned, mutable arena DOM with a serializer
//! - `index`: bookmark index from structural paths to DOM nodes
//! - `containerpage`: page model, read path and merge-on-write path
//! - `config`: type configuration documents and their versioned cache
//! - `store`, `locale`: collaborator traits the documents are read through
//!
//! ```no_run
//! use containerpage::{ContainerPageDocument, FixedLocaleCatalog, Locale, MemoryStore, RequestContext};
//!
//! # fn main() -> Result<(), containerpage::PageError> {
//! let store = MemoryStore::new();
//! let catalog = FixedLocaleCatalog::new("en");
//! let ctx = RequestContext::new(&store, &store, &catalog);
//!
//! let doc = ContainerPageDocument::create(&Locale::from("en"))?;
//! if let Some(page) = doc.resolve_container_page(&ctx) {
//!     for container in page.iter() {
//!         println!("{} holds {} elements", container.name, container.elements.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod containerpage;
pub mod core;
pub mod dom;
pub mod index;
pub mod locale;
pub mod reader;
pub mod store;

pub use config::{ConfigError, ConfigurationCache, ConfigurationItem, ConfigurationParser, FormatterConfiguration, LazyFolder};
pub use containerpage::{Container, ContainerElement, ContainerPage, ContainerPageDocument, PageError};
pub use dom::{XmlDocument, XmlError};
pub use index::{Bookmark, BookmarkIndex, BookmarkPath};
pub use locale::{resolve_locale, FixedLocaleCatalog, Locale, LocaleCatalog};
pub use store::{
    MemoryStore, PropertyDefinition, PropertyDefinitionResolver, PropertyType, RequestContext, Resource, ResourceStore,
    StoreError,
};
