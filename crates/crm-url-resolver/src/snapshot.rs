//! Offline stand-ins for the live collaborators.

use std::path::Path;
use std::sync::Arc;

use crm_entity::{InMemoryRecordStore, ModuleSet};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::InMemoryExtensionRegistry;
use crate::resolver::UrlResolverBuilder;

/// A JSON dump of the data a resolver reads from its collaborators.
///
/// ```json
/// {
///   "entity_types": [{"id": 1, "entity_type_id": 130, "code": "INVOICE"}],
///   "extensions": {
///     "sections": [{"code": "sales", "pages": [{"code": "invoices", "settings": "crm_130"}]}],
///     "page_entity_types": {"crm_130": 130}
///   },
///   "modules": ["crm", "intranet"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Dynamic type rows.
    pub entity_types: InMemoryRecordStore,
    /// Custom sections.
    pub extensions: InMemoryExtensionRegistry,
    /// Available modules; all modules are available when omitted.
    pub modules: Option<ModuleSet>,
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Wires the snapshot's collaborators into a builder.
    pub fn apply(self, builder: UrlResolverBuilder) -> UrlResolverBuilder {
        let builder = builder
            .record_store(Arc::new(self.entity_types))
            .extension_registry(Arc::new(self.extensions));
        match self.modules {
            Some(modules) => builder.capability_gate(Arc::new(modules)),
            None => builder,
        }
    }
}
