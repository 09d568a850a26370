//! DOM Module - Arena-based XML Document
//!
//! Implements an owned, mutable DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for element/attribute names and text

pub mod document;
pub mod errors;
pub mod node;
pub mod strings;
pub mod writer;

pub use document::{ChildIter, XmlDocument, DOCUMENT_NODE};
pub use errors::XmlError;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;
pub use writer::XML_DECLARATION;
