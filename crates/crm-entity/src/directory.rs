//! Lookup of dynamic entity types by code, name or id.
//!
//! Rows are read from the record store on the first lookup and kept for the
//! lifetime of the directory. Nothing is ever evicted, so a directory must be
//! recreated when types are registered or removed at runtime.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::{EntityError, Result};
use crate::owner_type::{EntityTypeId, EntityTypeRecord};
use crate::store::{CapabilityGate, RecordStore};

/// Module that must be available for any lookup.
pub const CRM_MODULE: &str = "crm";

/// Cached view over the dynamic type table.
pub struct EntityTypeDirectory<S: RecordStore, G: CapabilityGate> {
    store: S,
    gate: G,
    cache: Mutex<Option<Arc<Vec<EntityTypeRecord>>>>,
}

impl<S: RecordStore, G: CapabilityGate> EntityTypeDirectory<S, G> {
    /// Creates a directory; no rows are read until the first lookup.
    pub fn new(store: S, gate: G) -> Self {
        Self {
            store,
            gate,
            cache: Mutex::new(None),
        }
    }

    /// Returns the entity type id of the type with the given code.
    pub fn entity_type_id_by_code(&self, code: &str) -> Result<EntityTypeId> {
        self.find(|record| record.code == code)?
            .map(|record| record.entity_type_id)
            .ok_or_else(|| EntityError::EntityTypeNotFound(code.to_string()))
    }

    /// Returns the entity type id of the type with the given display name.
    pub fn entity_type_id_by_name(&self, name: &str) -> Result<EntityTypeId> {
        self.find(|record| record.name == name)?
            .map(|record| record.entity_type_id)
            .ok_or_else(|| EntityError::EntityTypeNotFound(name.to_string()))
    }

    /// Returns the row describing the given entity type.
    pub fn entity_type(&self, entity_type_id: EntityTypeId) -> Result<EntityTypeRecord> {
        self.find(|record| record.entity_type_id == entity_type_id)?
            .ok_or_else(|| EntityError::EntityTypeNotFound(entity_type_id.to_string()))
    }

    /// Returns true once the rows have been read from the store.
    pub fn is_loaded(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn find(&self, pred: impl Fn(&EntityTypeRecord) -> bool) -> Result<Option<EntityTypeRecord>> {
        let rows = self.rows()?;
        Ok(rows.iter().find(|record| pred(record)).cloned())
    }

    fn rows(&self) -> Result<Arc<Vec<EntityTypeRecord>>> {
        if !self.gate.include_module(CRM_MODULE) {
            return Err(EntityError::ModuleNotIncluded(CRM_MODULE.to_string()));
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rows) = cache.as_ref() {
            return Ok(Arc::clone(rows));
        }

        let rows = Arc::new(self.store.list_entity_types()?);
        debug!(count = rows.len(), "loaded dynamic entity types");
        *cache = Some(Arc::clone(&rows));
        Ok(rows)
    }
}
