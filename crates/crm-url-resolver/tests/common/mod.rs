#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crm_entity::{
    EntityError, EntityTypeId, EntityTypeRecord, InMemoryRecordStore, RecordStore,
};
use crm_url_resolver::{
    CustomSection, InMemoryExtensionRegistry, StaticRequestContext, UrlResolver,
};

pub const INVOICES: EntityTypeId = EntityTypeId::new(130);
pub const TENDERS: EntityTypeId = EntityTypeId::new(134);

pub fn defaults() -> UrlResolver {
    UrlResolver::builder()
        .build()
        .unwrap_or_else(|e| panic!("Failed to build default resolver: {e}"))
}

pub fn store() -> InMemoryRecordStore {
    InMemoryRecordStore::new()
        .with_type(EntityTypeRecord::new(1, INVOICES, "INVOICE", "Invoices"))
        .with_type(EntityTypeRecord::new(2, TENDERS, "TENDER", "Tenders"))
}

pub fn registry() -> InMemoryExtensionRegistry {
    InMemoryExtensionRegistry::new()
        .section(
            CustomSection::new("sales")
                .page("invoices", "crm_130")
                .page("deals", "crm_deal")
                .page("dashboard", "report_sales"),
        )
        .settings("crm_130", INVOICES)
        .settings("crm_deal", EntityTypeId::DEAL)
}

pub fn full() -> UrlResolver {
    UrlResolver::builder()
        .record_store(Arc::new(store()))
        .extension_registry(Arc::new(registry()))
        .build()
        .unwrap_or_else(|e| panic!("Failed to build resolver: {e}"))
}

pub fn with_context(context: Arc<StaticRequestContext>) -> UrlResolver {
    UrlResolver::builder()
        .record_store(Arc::new(store()))
        .request_context(context)
        .build()
        .unwrap_or_else(|e| panic!("Failed to build resolver: {e}"))
}

/// A record store that counts reads and can be told to fail.
#[derive(Default)]
pub struct ProbeStore {
    pub reads: AtomicUsize,
    pub fail: bool,
}

impl ProbeStore {
    pub fn failing() -> Self {
        Self {
            reads: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl RecordStore for ProbeStore {
    fn list_entity_types(&self) -> crm_entity::Result<Vec<EntityTypeRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EntityError::Store("connection lost".to_string()));
        }
        store().list_entity_types()
    }
}
