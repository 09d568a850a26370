//! External collaborators
//!
//! Page and configuration documents live in a resource store the crate does
//! not own. Everything the core needs from it goes through the traits here,
//! bundled per request in a [`RequestContext`].

use std::collections::HashMap;

use uuid::Uuid;

use crate::locale::{Locale, LocaleCatalog};

pub mod errors;
pub mod memory;
pub mod property;

pub use errors::StoreError;
pub use memory::MemoryStore;
pub use property::{PropertyDefinition, PropertyType};

/// Metadata of a stored resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Stable identity, survives moves and renames
    pub structure_id: Uuid,
    /// Absolute path inside the store
    pub root_path: String,
    /// Resource type name, e.g. `article` or `containerpage`
    pub type_name: String,
    /// Increases whenever the content changes
    pub version: u64,
}

/// Read/write access to stored resources
pub trait ResourceStore: Send + Sync {
    /// Resolve a structure id
    fn read_resource(&self, id: Uuid) -> Result<Resource, StoreError>;

    /// Resolve a root path
    fn read_resource_by_path(&self, path: &str) -> Result<Resource, StoreError>;

    /// Current content of a resource
    fn read_file(&self, resource: &Resource) -> Result<Vec<u8>, StoreError>;

    /// Replace the content of a locked resource, returning the updated metadata
    fn write_file(&self, resource: &Resource, content: &[u8]) -> Result<Resource, StoreError>;

    fn lock_resource(&self, resource: &Resource) -> Result<(), StoreError>;

    fn unlock_resource(&self, resource: &Resource) -> Result<(), StoreError>;
}

/// Source of the element settings that apply to a resource
pub trait PropertyDefinitionResolver: Send + Sync {
    fn element_settings(&self, resource: &Resource) -> Result<HashMap<String, PropertyDefinition>, StoreError>;
}

/// Collaborators and caller state for one logical request
#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    pub store: &'a dyn ResourceStore,
    pub properties: &'a dyn PropertyDefinitionResolver,
    pub locales: &'a dyn LocaleCatalog,
    pub request_locale: Option<&'a Locale>,
}

impl<'a> RequestContext<'a> {
    pub fn new(
        store: &'a dyn ResourceStore,
        properties: &'a dyn PropertyDefinitionResolver,
        locales: &'a dyn LocaleCatalog,
    ) -> Self {
        RequestContext {
            store,
            properties,
            locales,
            request_locale: None,
        }
    }

    /// Use `locale` as the caller's current locale
    pub fn with_locale(mut self, locale: &'a Locale) -> Self {
        self.request_locale = Some(locale);
        self
    }
}

impl std::fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_locale", &self.request_locale)
            .finish_non_exhaustive()
    }
}
