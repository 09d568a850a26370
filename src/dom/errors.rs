//! Error types for XML reading and DOM construction.

use thiserror::Error;

/// Errors raised while reading raw XML into a [`crate::dom::XmlDocument`].
///
/// Positions are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// Markup could not be tokenized
    #[error("malformed XML at byte {position}: {message}")]
    Syntax {
        position: usize,
        message: &'static str,
    },

    /// An end tag does not match the innermost open element
    #[error("tag mismatch at byte {position}: <{expected}> closed with </{found}>")]
    TagMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// Input ended while an element was still open
    #[error("unclosed tag: <{0}>")]
    UnclosedTag(String),

    /// The document contains no element at all
    #[error("document has no root element")]
    NoRootElement,

    /// A second top-level element or non-whitespace text follows the root
    #[error("content not allowed after root element at byte {position}")]
    ContentAfterRoot { position: usize },

    /// The input is not valid UTF-8
    #[error("invalid UTF-8 at byte {position}")]
    InvalidUtf8 { position: usize },
}

impl XmlError {
    pub(crate) fn syntax(position: usize, message: &'static str) -> Self {
        XmlError::Syntax { position, message }
    }
}
