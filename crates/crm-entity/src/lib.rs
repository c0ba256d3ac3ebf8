//! # crm-entity
//!
//! Entity type vocabulary shared by the CRM helper crates.
//!
//! This crate provides:
//! - [`EntityTypeId`] with the built-in CRM types and the dynamic type range
//! - The [`RecordStore`] and [`CapabilityGate`] collaborator traits
//! - In-memory collaborators for tests and offline tooling
//! - [`EntityTypeDirectory`], a cached lookup of dynamic types
//!
//! ## Example
//!
//! ```
//! use crm_entity::{
//!     EntityTypeDirectory, EntityTypeId, EntityTypeRecord, InMemoryRecordStore, ModuleSet,
//! };
//!
//! let store = InMemoryRecordStore::new()
//!     .with_type(EntityTypeRecord::new(1, EntityTypeId::new(128), "INVOICE", "Invoices"));
//! let directory = EntityTypeDirectory::new(store, ModuleSet::new().with_module("crm"));
//!
//! assert_eq!(
//!     directory.entity_type_id_by_code("INVOICE").unwrap(),
//!     EntityTypeId::new(128)
//! );
//! ```

mod directory;
mod error;
mod owner_type;
mod store;

pub use directory::{EntityTypeDirectory, CRM_MODULE};
pub use error::{EntityError, Result};
pub use owner_type::{EntityTypeId, EntityTypeRecord};
pub use store::{CapabilityGate, InMemoryRecordStore, ModuleSet, RecordStore};
