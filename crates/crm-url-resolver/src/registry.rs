//! Custom sections registered by extensions.

use std::collections::HashMap;
use std::sync::Arc;

use crm_entity::{EntityTypeId, Result};
use serde::{Deserialize, Serialize};

/// A page inside a custom section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSectionPage {
    /// Page code, unique within its section.
    pub code: String,
    /// Opaque settings string that identifies what the page shows.
    #[serde(default)]
    pub settings: String,
}

/// A URL area registered by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSection {
    /// Section code.
    pub code: String,
    /// Pages of the section.
    #[serde(default)]
    pub pages: Vec<CustomSectionPage>,
}

impl CustomSection {
    /// Creates a section without pages.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            pages: Vec::new(),
        }
    }

    /// Adds a page.
    #[must_use]
    pub fn page(mut self, code: impl Into<String>, settings: impl Into<String>) -> Self {
        self.pages.push(CustomSectionPage {
            code: code.into(),
            settings: settings.into(),
        });
        self
    }
}

/// Source of custom sections and the URLs of their pages.
pub trait ExtensionRegistry: Send + Sync {
    /// Returns every registered custom section.
    fn custom_sections(&self) -> Result<Vec<CustomSection>>;

    /// Maps page settings to the entity type the page displays, if any.
    fn entity_type_id_for_page_settings(&self, settings: &str) -> Option<EntityTypeId>;

    /// Returns the path of a section page, e.g. `/page/sales/invoices/`.
    fn url_for_section_page(&self, section_code: &str, page_code: &str) -> String;
}

impl<T: ExtensionRegistry + ?Sized> ExtensionRegistry for Arc<T> {
    fn custom_sections(&self) -> Result<Vec<CustomSection>> {
        (**self).custom_sections()
    }

    fn entity_type_id_for_page_settings(&self, settings: &str) -> Option<EntityTypeId> {
        (**self).entity_type_id_for_page_settings(settings)
    }

    fn url_for_section_page(&self, section_code: &str, page_code: &str) -> String {
        (**self).url_for_section_page(section_code, page_code)
    }
}

/// An extension registry backed by fixed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryExtensionRegistry {
    /// Registered sections.
    #[serde(default)]
    pub sections: Vec<CustomSection>,
    /// Page settings mapped to the entity type they display.
    #[serde(default)]
    pub page_entity_types: HashMap<String, EntityTypeId>,
    /// Path all section URLs start with.
    #[serde(default = "default_url_root")]
    pub url_root: String,
}

fn default_url_root() -> String {
    "/page/".to_string()
}

impl Default for InMemoryExtensionRegistry {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            page_entity_types: HashMap::new(),
            url_root: default_url_root(),
        }
    }
}

impl InMemoryExtensionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section.
    #[must_use]
    pub fn section(mut self, section: CustomSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Maps page settings to an entity type.
    #[must_use]
    pub fn settings(mut self, settings: impl Into<String>, entity_type_id: EntityTypeId) -> Self {
        self.page_entity_types.insert(settings.into(), entity_type_id);
        self
    }
}

impl ExtensionRegistry for InMemoryExtensionRegistry {
    fn custom_sections(&self) -> Result<Vec<CustomSection>> {
        Ok(self.sections.clone())
    }

    fn entity_type_id_for_page_settings(&self, settings: &str) -> Option<EntityTypeId> {
        self.page_entity_types.get(settings).copied()
    }

    fn url_for_section_page(&self, section_code: &str, page_code: &str) -> String {
        format!("{}{}/{}/", self.url_root, section_code, page_code)
    }
}
