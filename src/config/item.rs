//! Parsed configuration records.

use uuid::Uuid;

use super::formatter::FormatterBinding;
use crate::store::{RequestContext, Resource, StoreError};

/// Destination folder for new content of a type
///
/// Either a folder resource that was declared and resolved, or a path
/// derived from the type name that may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyFolder {
    Resolved(Resource),
    Path(String),
}

impl LazyFolder {
    /// Default folder for a type: `/` followed by the type name
    pub fn for_type(type_name: &str) -> Self {
        LazyFolder::Path(format!("/{type_name}"))
    }

    pub fn path(&self) -> &str {
        match self {
            LazyFolder::Resolved(resource) => &resource.root_path,
            LazyFolder::Path(path) => path,
        }
    }

    /// Look the folder up in the store
    pub fn resolve(&self, ctx: &RequestContext<'_>) -> Result<Resource, StoreError> {
        match self {
            LazyFolder::Resolved(resource) => Ok(resource.clone()),
            LazyFolder::Path(path) => ctx.store.read_resource_by_path(path),
        }
    }
}

/// Creation settings for one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationItem {
    /// Prototype copied when a new element of this type is created
    pub source: Resource,
    /// Declared destination folder, if any
    pub folder: Option<Resource>,
    pub lazy_folder: LazyFolder,
    /// File name pattern for new resources, e.g. `/article_%(number).html`
    pub pattern: Option<String>,
    pub formatters: Vec<FormatterBinding>,
}

/// Page used to show single resources of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPageInfo {
    pub type_name: String,
    pub page_id: Uuid,
    pub page_path: String,
}
