//! Collaborator seams: the record store and the capability gate.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::owner_type::{EntityTypeId, EntityTypeRecord};

/// Supplies entity type rows.
///
/// Implementations are expected to be fast, local lookups. Failures propagate
/// to the caller unchanged.
pub trait RecordStore: Send + Sync {
    /// Returns every registered dynamic type.
    fn list_entity_types(&self) -> Result<Vec<EntityTypeRecord>>;

    /// Returns true if `id` belongs to the dynamic type id range.
    fn is_dynamic_type_id(&self, id: EntityTypeId) -> bool {
        id.is_possible_dynamic_type()
    }
}

/// Reports whether an optional platform module is available.
pub trait CapabilityGate: Send + Sync {
    /// Returns true if the named module can be used.
    fn include_module(&self, name: &str) -> bool;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn list_entity_types(&self) -> Result<Vec<EntityTypeRecord>> {
        (**self).list_entity_types()
    }

    fn is_dynamic_type_id(&self, id: EntityTypeId) -> bool {
        (**self).is_dynamic_type_id(id)
    }
}

impl<T: CapabilityGate + ?Sized> CapabilityGate for Arc<T> {
    fn include_module(&self, name: &str) -> bool {
        (**self).include_module(name)
    }
}

/// A record store backed by a fixed list of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryRecordStore {
    types: Vec<EntityTypeRecord>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row.
    #[must_use]
    pub fn with_type(mut self, record: EntityTypeRecord) -> Self {
        self.types.push(record);
        self
    }

    /// Returns the stored rows.
    pub fn types(&self) -> &[EntityTypeRecord] {
        &self.types
    }
}

impl FromIterator<EntityTypeRecord> for InMemoryRecordStore {
    fn from_iter<I: IntoIterator<Item = EntityTypeRecord>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_entity_types(&self) -> Result<Vec<EntityTypeRecord>> {
        Ok(self.types.clone())
    }
}

/// A capability gate listing the available modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleSet {
    modules: HashSet<String>,
}

impl ModuleSet {
    /// Creates a gate with no modules available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a module as available.
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>) -> Self {
        self.modules.insert(name.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl CapabilityGate for ModuleSet {
    fn include_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }
}
