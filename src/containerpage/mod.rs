//! Container page documents
//!
//! A container page stores, per locale, an ordered list of named containers,
//! each holding an ordered list of placed content elements.
//!
//! ```text
//! ContainerPages
//! └── ContainerPage language="en"
//!     └── Containers*
//!         ├── Name, Type
//!         ├── Attribute { Key, Value }*
//!         └── Elements*
//!             ├── Uri { link }
//!             ├── Formatter { link }?
//!             ├── CreateNew?
//!             └── Properties { Name, Value }*
//! ```

pub mod beans;
pub mod document;
pub mod errors;
pub mod link;
pub mod nodes;
pub mod properties;

pub use beans::{Container, ContainerElement, ContainerPage};
pub use document::ContainerPageDocument;
pub use errors::PageError;
pub use link::Link;
pub use nodes::PageNode;
