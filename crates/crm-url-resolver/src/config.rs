//! Classifier configuration.

use std::path::Path;

use crm_entity::EntityTypeId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pattern::PageKind;

/// A compiled-in section: one entity type and its base template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinSection {
    /// Entity type served by the section.
    pub entity_type_id: EntityTypeId,
    /// Base path template (a regex fragment).
    pub template: String,
}

impl BuiltinSection {
    /// Creates a section.
    pub fn new(entity_type_id: EntityTypeId, template: impl Into<String>) -> Self {
        Self {
            entity_type_id,
            template: template.into(),
        }
    }
}

/// Settings for building a [`UrlResolver`](crate::UrlResolver).
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Suffix appended to base templates for list pages.
    pub list_suffix: String,
    /// Suffix appended to base templates for detail pages.
    pub detail_suffix: String,
    /// Sections that always come first in the route table.
    pub builtin_sections: Vec<BuiltinSection>,
    /// Extra template tried by the deal list query.
    pub deal_category_template: String,
    /// Template for dynamic types; `{id}` is replaced by the entity type id.
    pub dynamic_type_template: String,
    /// Escape paths returned by the extension registry before embedding them.
    pub escape_registered_paths: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            list_suffix: PageKind::LIST_SUFFIX.to_string(),
            detail_suffix: PageKind::DETAIL_SUFFIX.to_string(),
            builtin_sections: vec![
                BuiltinSection::new(EntityTypeId::LEAD, "^/crm/lead/"),
                BuiltinSection::new(EntityTypeId::DEAL, "^/crm/deal/"),
                BuiltinSection::new(EntityTypeId::CONTACT, "^/crm/contact/"),
                BuiltinSection::new(EntityTypeId::COMPANY, "^/crm/company/"),
            ],
            deal_category_template: "^/crm/deal/category/".to_string(),
            dynamic_type_template: "^/crm/type/{id}/".to_string(),
            escape_registered_paths: true,
        }
    }
}

impl ResolverConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Returns the configured suffix for a page kind.
    pub fn suffix(&self, kind: PageKind) -> &str {
        match kind {
            PageKind::List => &self.list_suffix,
            PageKind::Detail => &self.detail_suffix,
        }
    }

    /// Builds the base template of a dynamic type.
    pub fn dynamic_type_template(&self, entity_type_id: EntityTypeId) -> String {
        self.dynamic_type_template
            .replace("{id}", &entity_type_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.suffix(PageKind::List), "list/");
        assert_eq!(config.suffix(PageKind::Detail), r"details/[0-9]+/");
        assert_eq!(config.builtin_sections.len(), 4);
        assert!(config.escape_registered_paths);
        assert_eq!(
            config.dynamic_type_template(EntityTypeId::new(130)),
            "^/crm/type/130/"
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ResolverConfig::from_json_str(r#"{"list_suffix": "index/"}"#).unwrap();
        assert_eq!(config.list_suffix, "index/");
        assert_eq!(config.detail_suffix, r"details/[0-9]+/");
        assert_eq!(config.builtin_sections[0].template, "^/crm/lead/");
    }

    #[test]
    fn test_builtin_sections_from_json() {
        let config = ResolverConfig::from_json_str(
            r#"{"builtin_sections": [{"entity_type_id": 1, "template": "^/leads/"}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.builtin_sections,
            vec![BuiltinSection::new(EntityTypeId::LEAD, "^/leads/")]
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(ResolverConfig::from_json_str("{").is_err());
    }
}
