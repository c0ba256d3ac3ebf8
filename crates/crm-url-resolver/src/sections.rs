//! Route table construction.
//!
//! A route table maps each entity type to the base path templates of its
//! pages. It is assembled from an ordered list of [`SectionSource`]s: the
//! compiled-in CRM sections first, then the dynamic types known to the record
//! store, then the custom sections registered by extensions. Templates keep
//! their order of first appearance per entity type and exact duplicates are
//! dropped. Templates of different entity types are never merged.

use std::collections::HashMap;

use crm_entity::{EntityTypeId, RecordStore};
use tracing::debug;

use crate::config::{BuiltinSection, ResolverConfig};
use crate::error::Result;
use crate::registry::ExtensionRegistry;

/// Templates contributed by a single source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFragment {
    entries: Vec<(EntityTypeId, Vec<String>)>,
}

impl RouteFragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template for an entity type.
    pub fn insert(&mut self, entity_type_id: EntityTypeId, template: impl Into<String>) {
        let template = template.into();
        match self.entries.iter_mut().find(|(id, _)| *id == entity_type_id) {
            Some((_, templates)) => templates.push(template),
            None => self.entries.push((entity_type_id, vec![template])),
        }
    }

    /// Adds a template, builder style.
    #[must_use]
    pub fn with(mut self, entity_type_id: EntityTypeId, template: impl Into<String>) -> Self {
        self.insert(entity_type_id, template);
        self
    }

    /// Returns the number of entity types in the fragment.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the fragment contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entity types and their templates.
    pub fn iter(&self) -> impl Iterator<Item = (EntityTypeId, &[String])> {
        self.entries
            .iter()
            .map(|(id, templates)| (*id, templates.as_slice()))
    }
}

/// The merged mapping from entity type to base templates.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Templates per entity type.
    entries: HashMap<EntityTypeId, Vec<String>>,
    /// Entity types in order of first appearance.
    order: Vec<EntityTypeId>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a fragment into the table.
    ///
    /// A template already present for the same entity type is skipped.
    pub fn merge(&mut self, fragment: &RouteFragment) {
        for (entity_type_id, templates) in fragment.iter() {
            for template in templates {
                self.push(entity_type_id, template);
            }
        }
    }

    fn push(&mut self, entity_type_id: EntityTypeId, template: &str) {
        if !self.entries.contains_key(&entity_type_id) {
            self.order.push(entity_type_id);
        }
        let templates = self.entries.entry(entity_type_id).or_default();
        if !templates.iter().any(|existing| existing == template) {
            templates.push(template.to_string());
        }
    }

    /// Returns the templates of an entity type.
    pub fn templates(&self, entity_type_id: EntityTypeId) -> Option<&[String]> {
        self.entries.get(&entity_type_id).map(Vec::as_slice)
    }

    /// Returns true if the entity type has at least one template.
    pub fn contains(&self, entity_type_id: EntityTypeId) -> bool {
        self.entries.contains_key(&entity_type_id)
    }

    /// Iterates over entity types in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (EntityTypeId, &[String])> {
        self.order.iter().filter_map(|id| {
            self.entries
                .get(id)
                .map(|templates| (*id, templates.as_slice()))
        })
    }

    /// Returns the number of entity types.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the table has no entity types.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the total number of templates.
    pub fn template_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl FromIterator<RouteFragment> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteFragment>>(iter: I) -> Self {
        let mut table = Self::new();
        for fragment in iter {
            table.merge(&fragment);
        }
        table
    }
}

/// A provider of route fragments.
pub trait SectionSource {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Reads the fragment. Called once per table build.
    fn fragment(&self) -> Result<RouteFragment>;
}

/// The compiled-in CRM sections.
pub struct BuiltinSections<'a> {
    sections: &'a [BuiltinSection],
}

impl<'a> BuiltinSections<'a> {
    /// Creates a source over the given sections.
    pub fn new(sections: &'a [BuiltinSection]) -> Self {
        Self { sections }
    }
}

impl SectionSource for BuiltinSections<'_> {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn fragment(&self) -> Result<RouteFragment> {
        Ok(self
            .sections
            .iter()
            .fold(RouteFragment::new(), |fragment, section| {
                fragment.with(section.entity_type_id, section.template.as_str())
            }))
    }
}

/// Dynamic types read from the record store.
pub struct DynamicTypeSections<'a> {
    store: &'a dyn RecordStore,
    config: &'a ResolverConfig,
}

impl<'a> DynamicTypeSections<'a> {
    /// Creates a source reading from `store`.
    pub fn new(store: &'a dyn RecordStore, config: &'a ResolverConfig) -> Self {
        Self { store, config }
    }
}

impl SectionSource for DynamicTypeSections<'_> {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn fragment(&self) -> Result<RouteFragment> {
        let mut fragment = RouteFragment::new();
        for record in self.store.list_entity_types()? {
            fragment.insert(
                record.entity_type_id,
                self.config.dynamic_type_template(record.entity_type_id),
            );
        }
        Ok(fragment)
    }
}

/// Custom section pages that display an entity type.
pub struct CustomSections<'a> {
    registry: &'a dyn ExtensionRegistry,
    escape_paths: bool,
}

impl<'a> CustomSections<'a> {
    /// Creates a source reading from `registry`.
    ///
    /// With `escape_paths` set, the page path is matched literally. Otherwise
    /// it is embedded as a raw regex fragment.
    pub fn new(registry: &'a dyn ExtensionRegistry, escape_paths: bool) -> Self {
        Self {
            registry,
            escape_paths,
        }
    }

    fn template(&self, path: &str, entity_type_id: EntityTypeId) -> String {
        if self.escape_paths {
            format!("^{}type/{}/", regex::escape(path), entity_type_id)
        } else {
            format!("^{path}type/{entity_type_id}/")
        }
    }
}

impl SectionSource for CustomSections<'_> {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn fragment(&self) -> Result<RouteFragment> {
        let mut fragment = RouteFragment::new();
        for section in self.registry.custom_sections()? {
            for page in &section.pages {
                let Some(entity_type_id) =
                    self.registry.entity_type_id_for_page_settings(&page.settings)
                else {
                    debug!(
                        section = %section.code,
                        page = %page.code,
                        "custom section page shows no entity type"
                    );
                    continue;
                };
                let path = self.registry.url_for_section_page(&section.code, &page.code);
                fragment.insert(entity_type_id, self.template(&path, entity_type_id));
            }
        }
        Ok(fragment)
    }
}

/// Builds a [`RouteTable`] from sources in priority order.
#[derive(Default)]
pub struct RouteTableBuilder<'a> {
    sources: Vec<Box<dyn SectionSource + 'a>>,
}

impl<'a> RouteTableBuilder<'a> {
    /// Creates a builder without sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source; earlier sources win positionally.
    #[must_use]
    pub fn source(mut self, source: impl SectionSource + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Reads every source once and merges the fragments.
    pub fn build(self) -> Result<RouteTable> {
        let mut table = RouteTable::new();
        for source in &self.sources {
            let fragment = source.fragment()?;
            debug!(
                source = source.name(),
                entity_types = fragment.len(),
                "merging route fragment"
            );
            table.merge(&fragment);
        }
        Ok(table)
    }
}
