//! In-memory resource store
//!
//! Implements both collaborator traits over plain maps. Element settings are
//! registered per resource type name.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::{PropertyDefinition, PropertyDefinitionResolver, Resource, ResourceStore, StoreError};

struct StoredResource {
    resource: Resource,
    content: Vec<u8>,
    locked: bool,
}

/// Thread-safe in-memory [`ResourceStore`]
#[derive(Default)]
pub struct MemoryStore {
    resources: RwLock<HashMap<Uuid, StoredResource>>,
    paths: RwLock<HashMap<String, Uuid>>,
    settings: RwLock<HashMap<String, HashMap<String, PropertyDefinition>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource with a fresh structure id
    pub fn add_resource(&self, root_path: &str, type_name: &str, content: impl Into<Vec<u8>>) -> Resource {
        self.insert_resource(Uuid::new_v4(), root_path, type_name, content)
    }

    /// Add a resource under a known structure id, replacing any previous one
    pub fn insert_resource(
        &self,
        structure_id: Uuid,
        root_path: &str,
        type_name: &str,
        content: impl Into<Vec<u8>>,
    ) -> Resource {
        let resource = Resource {
            structure_id,
            root_path: root_path.to_string(),
            type_name: type_name.to_string(),
            version: 1,
        };
        let stored = StoredResource {
            resource: resource.clone(),
            content: content.into(),
            locked: false,
        };
        self.resources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(structure_id, stored);
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(root_path.to_string(), structure_id);
        resource
    }

    /// Replace content without taking the lock, as an outside editor would
    pub fn replace_content(&self, root_path: &str, content: impl Into<Vec<u8>>) -> Result<Resource, StoreError> {
        let id = self.id_for_path(root_path)?;
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let stored = resources.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        stored.content = content.into();
        stored.resource.version += 1;
        Ok(stored.resource.clone())
    }

    /// Declare the element settings of every resource of `type_name`
    pub fn set_element_settings(&self, type_name: &str, definitions: impl IntoIterator<Item = PropertyDefinition>) {
        let map = definitions
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect();
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_string(), map);
    }

    pub fn is_locked(&self, id: Uuid) -> bool {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .is_some_and(|stored| stored.locked)
    }

    fn id_for_path(&self, path: &str) -> Result<Uuid, StoreError> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .ok_or_else(|| StoreError::PathNotFound { path: path.to_string() })
    }

    fn set_locked(&self, resource: &Resource, locked: bool) -> Result<(), StoreError> {
        let id = resource.structure_id;
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let stored = resources.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        match (stored.locked, locked) {
            (true, true) => Err(StoreError::Locked { path: stored.resource.root_path.clone() }),
            (false, false) => Err(StoreError::NotLocked { path: stored.resource.root_path.clone() }),
            _ => {
                stored.locked = locked;
                Ok(())
            }
        }
    }
}

impl ResourceStore for MemoryStore {
    fn read_resource(&self, id: Uuid) -> Result<Resource, StoreError> {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|stored| stored.resource.clone())
            .ok_or(StoreError::NotFound { id })
    }

    fn read_resource_by_path(&self, path: &str) -> Result<Resource, StoreError> {
        let id = self.id_for_path(path)?;
        self.read_resource(id)
    }

    fn read_file(&self, resource: &Resource) -> Result<Vec<u8>, StoreError> {
        let id = resource.structure_id;
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|stored| stored.content.clone())
            .ok_or(StoreError::NotFound { id })
    }

    fn write_file(&self, resource: &Resource, content: &[u8]) -> Result<Resource, StoreError> {
        let id = resource.structure_id;
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let stored = resources.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        if !stored.locked {
            return Err(StoreError::NotLocked { path: stored.resource.root_path.clone() });
        }
        if stored.resource.version != resource.version {
            return Err(StoreError::VersionConflict {
                path: stored.resource.root_path.clone(),
                expected: resource.version,
                found: stored.resource.version,
            });
        }
        stored.content = content.to_vec();
        stored.resource.version += 1;
        tracing::debug!(path = %stored.resource.root_path, version = stored.resource.version, "Resource written");
        Ok(stored.resource.clone())
    }

    fn lock_resource(&self, resource: &Resource) -> Result<(), StoreError> {
        self.set_locked(resource, true)
    }

    fn unlock_resource(&self, resource: &Resource) -> Result<(), StoreError> {
        self.set_locked(resource, false)
    }
}

impl PropertyDefinitionResolver for MemoryStore {
    fn element_settings(&self, resource: &Resource) -> Result<HashMap<String, PropertyDefinition>, StoreError> {
        Ok(self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&resource.type_name)
            .cloned()
            .unwrap_or_default())
    }
}
