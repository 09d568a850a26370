//! Error types for container page documents.

use thiserror::Error;
use uuid::Uuid;

use crate::dom::XmlError;
use crate::locale::Locale;
use crate::store::StoreError;

/// Errors raised while reading, editing or saving a container page document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PageError {
    /// The raw document is not well-formed XML.
    #[error("Invalid XML")]
    Xml(#[from] XmlError),

    /// The XML is well-formed but a required node is missing or invalid.
    #[error("Malformed container page: {reason}")]
    Malformed {
        /// What was expected and where
        reason: String,
    },

    /// A content, formatter or setting reference does not resolve in the store.
    #[error("Unresolvable reference: {id}")]
    UnresolvableReference {
        /// The structure id that could not be resolved
        id: Uuid,
        /// The underlying store error
        #[source]
        source: StoreError,
    },

    /// A `vfslist` setting holds something that is not a structure id.
    #[error("Invalid reference {value:?} in setting {setting}")]
    InvalidReference {
        /// Setting name
        setting: String,
        /// The offending list entry
        value: String,
    },

    /// The document has no variant for this locale.
    #[error("Locale not present: {locale}")]
    MissingLocale {
        /// The requested locale
        locale: Locale,
    },

    /// The document already has a variant for this locale.
    #[error("Locale already present: {locale}")]
    DuplicateLocale {
        /// The locale that was added twice
        locale: Locale,
    },

    /// Reading, locking or writing the backing resource failed.
    #[error("Resource store operation failed")]
    Store(#[from] StoreError),
}

impl PageError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        PageError::Malformed { reason: reason.into() }
    }

    /// Check if this error was raised while reading a document.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            PageError::Xml(_) | PageError::Malformed { .. } | PageError::DuplicateLocale { .. }
        )
    }

    /// Check if this error is about a reference that could not be written.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            PageError::UnresolvableReference { .. } | PageError::InvalidReference { .. }
        )
    }
}
