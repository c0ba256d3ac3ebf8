//! # crm-url-resolver
//!
//! Answers "which entity type and page kind does this CRM URL show?".
//!
//! This crate provides:
//! - A route table merged from compiled-in sections, dynamic types and
//!   custom sections registered by extensions
//! - Lazily compiled list and detail pattern sets, cached per page kind
//! - Fixed-pattern checks for the task pages
//! - Fallback to the URL of the active request
//!
//! ## Quick Start
//!
//! ```
//! use crm_url_resolver::UrlResolver;
//!
//! let resolver = UrlResolver::builder().build().unwrap();
//!
//! assert!(resolver.is_lead_list(Some("/crm/lead/list/")));
//! assert!(resolver.is_deal_list(Some("/crm/deal/category/42/")));
//! assert!(resolver.is_company_detail(Some("/crm/company/details/123/")));
//! assert!(!resolver.is_company_detail(Some("/crm/company/details/abc/")));
//! ```
//!
//! ## Dynamic Types and Custom Sections
//!
//! ```
//! use std::sync::Arc;
//!
//! use crm_entity::{EntityTypeId, EntityTypeRecord, InMemoryRecordStore};
//! use crm_url_resolver::{CustomSection, InMemoryExtensionRegistry, UrlResolver};
//!
//! let invoices = EntityTypeId::new(130);
//! let store = InMemoryRecordStore::new()
//!     .with_type(EntityTypeRecord::new(1, invoices, "INVOICE", "Invoices"));
//! let registry = InMemoryExtensionRegistry::new()
//!     .section(CustomSection::new("sales").page("invoices", "crm_130"))
//!     .settings("crm_130", invoices);
//!
//! let resolver = UrlResolver::builder()
//!     .record_store(Arc::new(store))
//!     .extension_registry(Arc::new(registry))
//!     .build()
//!     .unwrap();
//!
//! assert!(resolver.is_dynamic_type_list(invoices, Some("/crm/type/130/list/")));
//! assert!(resolver.is_dynamic_type_detail(
//!     invoices,
//!     Some("/page/sales/invoices/type/130/details/7/")
//! ));
//! ```
//!
//! ## Current Request
//!
//! ```
//! use std::sync::Arc;
//!
//! use crm_url_resolver::{StaticRequestContext, UrlResolver};
//!
//! let context = Arc::new(StaticRequestContext::new());
//! let resolver = UrlResolver::builder()
//!     .request_context(context.clone())
//!     .build()
//!     .unwrap();
//!
//! assert!(!resolver.is_contact_list(None));
//! context.set("/crm/contact/list/");
//! assert!(resolver.is_contact_list(None));
//! ```

mod config;
mod context;
mod error;
pub mod global;
mod pattern;
mod registry;
mod resolver;
pub mod sections;
mod snapshot;

pub use config::{BuiltinSection, ResolverConfig};
pub use context::{current_url, RequestContext, StaticRequestContext};
pub use error::{ResolverError, Result};
pub use pattern::{compile, validate_fragment, Matcher, PageKind};
pub use registry::{CustomSection, CustomSectionPage, ExtensionRegistry, InMemoryExtensionRegistry};
pub use resolver::{
    Classification, CompiledPatternSet, TaskPage, UrlResolver, UrlResolverBuilder,
    INTRANET_MODULE,
};
pub use sections::{RouteFragment, RouteTable};
pub use snapshot::Snapshot;
