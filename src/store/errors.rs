//! Error types for the external resource store.

use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a [`super::ResourceStore`] or
/// [`super::PropertyDefinitionResolver`] implementation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No resource carries this structure id.
    #[error("Resource not found: {id}")]
    NotFound {
        /// The structure id that was looked up
        id: Uuid,
    },

    /// No resource lives at this root path.
    #[error("Resource not found at path: {path}")]
    PathNotFound {
        /// The root path that was looked up
        path: String,
    },

    /// The resource is already locked.
    #[error("Resource is locked: {path}")]
    Locked {
        /// Root path of the locked resource
        path: String,
    },

    /// A write or unlock was attempted without holding the lock.
    #[error("Resource is not locked: {path}")]
    NotLocked {
        /// Root path of the resource
        path: String,
    },

    /// The resource was modified since it was read.
    #[error("Stale resource {path}: expected version {expected}, found {found}")]
    VersionConflict {
        /// Root path of the resource
        path: String,
        /// Version the caller held
        expected: u64,
        /// Version currently stored
        found: u64,
    },
}

impl StoreError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. } | StoreError::PathNotFound { .. })
    }

    /// Check if this error is related to resource locking.
    pub fn is_lock_error(&self) -> bool {
        matches!(self, StoreError::Locked { .. } | StoreError::NotLocked { .. })
    }
}
