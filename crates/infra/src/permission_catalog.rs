//! The flat permission catalog.
//!
//! Permission records are the one entity kind without a soft-delete pair:
//! removal is a hard remove. A binding left pointing at a removed permission
//! simply never matches a name during resolution, which is default-deny.

use std::collections::HashMap;
use std::sync::RwLock;

use branchline_auth::PermissionRecord;
use branchline_core::PermissionId;

use crate::error::{EngineError, EngineResult};
use crate::store::StoreError;

#[derive(Debug, Default)]
pub struct PermissionCatalog {
    inner: RwLock<HashMap<PermissionId, PermissionRecord>>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability name to the catalog. Names are unique.
    pub fn create(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> EngineResult<PermissionRecord> {
        let record = PermissionRecord::new(name, description)?;
        let mut map = self.write()?;
        if map.values().any(|p| p.name == record.name) {
            return Err(EngineError::conflict("permission already exists"));
        }
        map.insert(record.id, record.clone());
        Ok(record)
    }

    pub fn list(&self) -> EngineResult<Vec<PermissionRecord>> {
        let map = self.read()?;
        let mut all: Vec<_> = map.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    pub fn get(&self, id: PermissionId) -> EngineResult<Option<PermissionRecord>> {
        Ok(self.read()?.get(&id).cloned())
    }

    pub fn find_by_name(&self, name: &str) -> EngineResult<Option<PermissionRecord>> {
        Ok(self.read()?.values().find(|p| p.name == name).cloned())
    }

    /// Rename and/or re-describe. A rename onto an existing name conflicts.
    pub fn update(
        &self,
        id: PermissionId,
        name: Option<String>,
        description: Option<String>,
    ) -> EngineResult<PermissionRecord> {
        let mut map = self.write()?;
        if let Some(new_name) = &name {
            let taken = map
                .values()
                .any(|p| p.id != id && p.name == *new_name);
            if taken {
                return Err(EngineError::conflict("permission name already exists"));
            }
        }
        let record = map.get_mut(&id).ok_or_else(EngineError::not_found)?;
        if let Some(new_name) = name {
            record.name = new_name;
        }
        if let Some(desc) = description {
            record.description = Some(desc);
        }
        Ok(record.clone())
    }

    /// Hard remove. Returns the removed record, `NotFound` if absent.
    pub fn remove(&self, id: PermissionId) -> EngineResult<PermissionRecord> {
        self.write()?.remove(&id).ok_or_else(EngineError::not_found)
    }

    /// Project a permission id to its current name, if any.
    pub fn name_of(&self, id: PermissionId) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.get(&id).map(|p| p.name.clone()))
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<PermissionId, PermissionRecord>>, StoreError>
    {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<PermissionId, PermissionRecord>>, StoreError>
    {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}
