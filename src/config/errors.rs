//! Error types for configuration documents.

use thiserror::Error;

use crate::dom::XmlError;
use crate::store::StoreError;

/// Errors raised while reading a configuration document.
///
/// Only [`ConfigError::MalformedEntry`] is recoverable: the parser logs it and
/// moves on to the next entry. Everything else aborts the parse.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not well-formed XML.
    #[error("Invalid configuration XML")]
    Xml(#[from] XmlError),

    /// The document has no locale variant to read from.
    #[error("No type configuration found in {path}")]
    NoTypeConfiguration {
        /// Root path of the configuration resource
        path: String,
    },

    /// One entry of the document is incomplete or references something missing.
    #[error("Malformed configuration entry: {reason}")]
    MalformedEntry {
        /// What is wrong with the entry
        reason: String,
    },

    /// Reading the configuration or a referenced resource failed.
    #[error("Resource store operation failed")]
    Store(#[from] StoreError),
}

impl ConfigError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ConfigError::MalformedEntry { reason: reason.into() }
    }

    /// Check if this error only affects a single entry.
    pub fn is_entry_error(&self) -> bool {
        matches!(self, ConfigError::MalformedEntry { .. })
    }
}
