//! The URL classifier.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};

use crm_entity::{CapabilityGate, EntityTypeId, RecordStore, CRM_MODULE};
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::config::ResolverConfig;
use crate::context::{current_url, RequestContext};
use crate::error::{ResolverError, Result};
use crate::pattern::{compile, validate_fragment, Matcher, PageKind};
use crate::registry::ExtensionRegistry;
use crate::sections::{
    BuiltinSections, CustomSections, DynamicTypeSections, RouteTable, RouteTableBuilder,
};

/// Module that provides custom sections.
pub const INTRANET_MODULE: &str = "intranet";

static TASKS_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/company/personal/user/[0-9]+/tasks/?/$").expect("valid tasks list pattern")
});

static TASK_VIEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/company/personal/user/[0-9]+/tasks/task/view/[0-9]+/?/")
        .expect("valid task view pattern")
});

static TASK_EDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/company/personal/user/[0-9]+/tasks/task/edit/[0-9]+/?/")
        .expect("valid task edit pattern")
});

/// Task pages, matched by fixed patterns outside the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPage {
    /// A user's task list.
    List,
    /// A single task, read only.
    View,
    /// The task edit form.
    Edit,
}

impl TaskPage {
    fn regex(self) -> &'static Regex {
        match self {
            Self::List => &*TASKS_LIST,
            Self::View => &*TASK_VIEW,
            Self::Edit => &*TASK_EDIT,
        }
    }
}

/// What a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A list or detail page of an entity type.
    Entity {
        /// The entity type.
        entity_type_id: EntityTypeId,
        /// List or detail.
        kind: PageKind,
    },
    /// One of the task pages.
    Task(TaskPage),
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity {
                entity_type_id,
                kind,
            } => write!(f, "entity {entity_type_id} {kind}"),
            Self::Task(TaskPage::List) => f.write_str("tasks list"),
            Self::Task(TaskPage::View) => f.write_str("task view"),
            Self::Task(TaskPage::Edit) => f.write_str("task edit"),
        }
    }
}

/// Matchers of one page kind, per entity type.
///
/// A template whose combined pattern fails to compile is logged and left
/// out of the set. The builder has already validated every fragment, so
/// only a combined pattern over the size limit can get here.
#[derive(Debug)]
pub struct CompiledPatternSet {
    matchers: HashMap<EntityTypeId, Vec<Matcher>>,
}

impl CompiledPatternSet {
    fn compile(table: &RouteTable, kind: PageKind, suffix: &str) -> Self {
        let mut matchers = HashMap::with_capacity(table.len());
        for (entity_type_id, templates) in table.iter() {
            let compiled = templates
                .iter()
                .filter_map(|template| match compile(template, suffix) {
                    Ok(matcher) => Some(matcher),
                    Err(err) => {
                        error!(%entity_type_id, %template, %kind, %err, "skipping template");
                        None
                    }
                })
                .collect();
            matchers.insert(entity_type_id, compiled);
        }
        debug!(%kind, entity_types = matchers.len(), "compiled pattern set");
        Self { matchers }
    }

    /// Returns the matchers of an entity type.
    pub fn matchers(&self, entity_type_id: EntityTypeId) -> Option<&[Matcher]> {
        self.matchers.get(&entity_type_id).map(Vec::as_slice)
    }

    /// Returns true if any matcher of the entity type matches the URL.
    pub fn matches(&self, entity_type_id: EntityTypeId, url: &str) -> bool {
        self.matchers(entity_type_id)
            .is_some_and(|matchers| matchers.iter().any(|m| m.is_match(url)))
    }
}

/// Classifies URLs as list or detail pages of CRM entity types.
///
/// The route table is built once, in [`UrlResolverBuilder::build`]. Pattern
/// sets are compiled separately per [`PageKind`] on the first query that
/// needs them and kept until the resolver is dropped.
///
/// Every query takes an optional URL. When it is `None` or empty, the URL of
/// the active request is used. Without any URL the answer is `false`.
pub struct UrlResolver {
    config: ResolverConfig,
    table: RouteTable,
    compiled: [OnceLock<CompiledPatternSet>; 2],
    deal_category: Matcher,
    record_store: Option<Arc<dyn RecordStore>>,
    request_context: Option<Arc<dyn RequestContext>>,
}

impl fmt::Debug for UrlResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResolver")
            .field("table", &self.table)
            .field("list_compiled", &self.is_compiled(PageKind::List))
            .field("detail_compiled", &self.is_compiled(PageKind::Detail))
            .finish_non_exhaustive()
    }
}

impl UrlResolver {
    /// Starts building a resolver.
    pub fn builder() -> UrlResolverBuilder {
        UrlResolverBuilder::default()
    }

    /// Returns true if the URL is a lead list page.
    pub fn is_lead_list(&self, url: Option<&str>) -> bool {
        self.is_entity_list(EntityTypeId::LEAD, url)
    }

    /// Returns true if the URL is a deal list page, including deal funnels.
    pub fn is_deal_list(&self, url: Option<&str>) -> bool {
        let Some(url) = self.url(url) else {
            return false;
        };
        self.pattern_set(PageKind::List)
            .matches(EntityTypeId::DEAL, &url)
            || self.deal_category.is_match(&url)
    }

    /// Returns true if the URL is a contact list page.
    pub fn is_contact_list(&self, url: Option<&str>) -> bool {
        self.is_entity_list(EntityTypeId::CONTACT, url)
    }

    /// Returns true if the URL is a company list page.
    pub fn is_company_list(&self, url: Option<&str>) -> bool {
        self.is_entity_list(EntityTypeId::COMPANY, url)
    }

    /// Returns true if the URL is a list page of the given dynamic type.
    ///
    /// Ids outside the dynamic type range are rejected without consulting the
    /// route table.
    pub fn is_dynamic_type_list(&self, entity_type_id: EntityTypeId, url: Option<&str>) -> bool {
        self.is_dynamic_type_id(entity_type_id) && self.is_entity_list(entity_type_id, url)
    }

    /// Returns true if the URL is a lead detail page.
    pub fn is_lead_detail(&self, url: Option<&str>) -> bool {
        self.is_entity_detail(EntityTypeId::LEAD, url)
    }

    /// Returns true if the URL is a deal detail page.
    pub fn is_deal_detail(&self, url: Option<&str>) -> bool {
        self.is_entity_detail(EntityTypeId::DEAL, url)
    }

    /// Returns true if the URL is a contact detail page.
    pub fn is_contact_detail(&self, url: Option<&str>) -> bool {
        self.is_entity_detail(EntityTypeId::CONTACT, url)
    }

    /// Returns true if the URL is a company detail page.
    pub fn is_company_detail(&self, url: Option<&str>) -> bool {
        self.is_entity_detail(EntityTypeId::COMPANY, url)
    }

    /// Returns true if the URL is a detail page of the given dynamic type.
    pub fn is_dynamic_type_detail(
        &self,
        entity_type_id: EntityTypeId,
        url: Option<&str>,
    ) -> bool {
        self.is_dynamic_type_id(entity_type_id) && self.is_entity_detail(entity_type_id, url)
    }

    /// Returns true if the URL is a user's task list.
    pub fn is_tasks_list(&self, url: Option<&str>) -> bool {
        self.is_task_page(TaskPage::List, url)
    }

    /// Returns true if the URL is a task view page.
    pub fn is_task_view(&self, url: Option<&str>) -> bool {
        self.is_task_page(TaskPage::View, url)
    }

    /// Returns true if the URL is a task edit page.
    pub fn is_task_edit(&self, url: Option<&str>) -> bool {
        self.is_task_page(TaskPage::Edit, url)
    }

    /// Returns true if the URL is a list page of the entity type.
    pub fn is_entity_list(&self, entity_type_id: EntityTypeId, url: Option<&str>) -> bool {
        self.is_entity_page(PageKind::List, entity_type_id, url)
    }

    /// Returns true if the URL is a detail page of the entity type.
    pub fn is_entity_detail(&self, entity_type_id: EntityTypeId, url: Option<&str>) -> bool {
        self.is_entity_page(PageKind::Detail, entity_type_id, url)
    }

    /// Works out what the URL points at.
    ///
    /// Task pages are checked first, then entity types in route table order,
    /// detail before list.
    pub fn classify(&self, url: Option<&str>) -> Option<Classification> {
        let url = self.url(url)?;

        if let Some(page) = [TaskPage::List, TaskPage::View, TaskPage::Edit]
            .into_iter()
            .find(|page| page.regex().is_match(&url))
        {
            return Some(Classification::Task(page));
        }

        let detail = self.pattern_set(PageKind::Detail);
        let list = self.pattern_set(PageKind::List);
        self.table.iter().find_map(|(entity_type_id, _)| {
            let kind = if detail.matches(entity_type_id, &url) {
                PageKind::Detail
            } else if list.matches(entity_type_id, &url)
                || (entity_type_id == EntityTypeId::DEAL && self.deal_category.is_match(&url))
            {
                PageKind::List
            } else {
                return None;
            };
            Some(Classification::Entity {
                entity_type_id,
                kind,
            })
        })
    }

    /// Returns the merged route table.
    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the configuration the resolver was built with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns true once the pattern set of `kind` has been compiled.
    pub fn is_compiled(&self, kind: PageKind) -> bool {
        self.compiled[kind.slot()].get().is_some()
    }

    fn is_entity_page(
        &self,
        kind: PageKind,
        entity_type_id: EntityTypeId,
        url: Option<&str>,
    ) -> bool {
        let Some(url) = self.url(url) else {
            return false;
        };
        self.pattern_set(kind).matches(entity_type_id, &url)
    }

    fn is_task_page(&self, page: TaskPage, url: Option<&str>) -> bool {
        self.url(url).is_some_and(|url| page.regex().is_match(&url))
    }

    fn is_dynamic_type_id(&self, entity_type_id: EntityTypeId) -> bool {
        match &self.record_store {
            Some(store) => store.is_dynamic_type_id(entity_type_id),
            None => entity_type_id.is_possible_dynamic_type(),
        }
    }

    fn url<'a>(&self, url: Option<&'a str>) -> Option<Cow<'a, str>> {
        match url {
            Some(url) if !url.is_empty() => Some(Cow::Borrowed(url)),
            _ => current_url(self.request_context.as_deref()).map(Cow::Owned),
        }
    }

    fn pattern_set(&self, kind: PageKind) -> &CompiledPatternSet {
        self.compiled[kind.slot()].get_or_init(|| {
            CompiledPatternSet::compile(&self.table, kind, self.config.suffix(kind))
        })
    }
}

/// Assembles a [`UrlResolver`] from its collaborators.
///
/// Every collaborator is optional. Without a record store no dynamic types
/// are routed; without an extension registry no custom sections are.
#[derive(Default)]
pub struct UrlResolverBuilder {
    config: Option<ResolverConfig>,
    record_store: Option<Arc<dyn RecordStore>>,
    extension_registry: Option<Arc<dyn ExtensionRegistry>>,
    capability_gate: Option<Arc<dyn CapabilityGate>>,
    request_context: Option<Arc<dyn RequestContext>>,
}

impl UrlResolverBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the record store that lists dynamic types.
    #[must_use]
    pub fn record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.record_store = Some(store);
        self
    }

    /// Sets the registry of custom sections.
    #[must_use]
    pub fn extension_registry(mut self, registry: Arc<dyn ExtensionRegistry>) -> Self {
        self.extension_registry = Some(registry);
        self
    }

    /// Sets the gate consulted before reading the record store and registry.
    #[must_use]
    pub fn capability_gate(mut self, gate: Arc<dyn CapabilityGate>) -> Self {
        self.capability_gate = Some(gate);
        self
    }

    /// Sets the source of the current request URL.
    #[must_use]
    pub fn request_context(mut self, context: Arc<dyn RequestContext>) -> Self {
        self.request_context = Some(context);
        self
    }

    /// Builds the route table and validates every template.
    ///
    /// Pattern sets are not compiled here.
    pub fn build(mut self) -> Result<UrlResolver> {
        let config = self.config.take().unwrap_or_default();

        for kind in PageKind::ALL {
            validate_fragment(config.suffix(kind))
                .map_err(|source| ResolverError::InvalidSuffix { kind, source })?;
        }

        let table = {
            let mut builder =
                RouteTableBuilder::new().source(BuiltinSections::new(&config.builtin_sections));

            if let Some(store) = &self.record_store {
                if self.module_available(CRM_MODULE) {
                    builder = builder.source(DynamicTypeSections::new(&**store, &config));
                } else {
                    warn!(module = CRM_MODULE, "module unavailable, skipping dynamic types");
                }
            }

            if let Some(registry) = &self.extension_registry {
                if self.module_available(INTRANET_MODULE) {
                    builder = builder.source(CustomSections::new(
                        &**registry,
                        config.escape_registered_paths,
                    ));
                } else {
                    warn!(module = INTRANET_MODULE, "module unavailable, skipping custom sections");
                }
            }

            builder.build()?
        };

        validate_table(&table)?;

        let deal_category = compile(&config.deal_category_template, "").map_err(|source| {
            ResolverError::InvalidTemplate {
                entity_type_id: EntityTypeId::DEAL,
                template: config.deal_category_template.clone(),
                source,
            }
        })?;

        info!(
            entity_types = table.len(),
            templates = table.template_count(),
            "url resolver ready"
        );

        Ok(UrlResolver {
            config,
            table,
            compiled: [OnceLock::new(), OnceLock::new()],
            deal_category,
            record_store: self.record_store,
            request_context: self.request_context,
        })
    }

    fn module_available(&self, name: &str) -> bool {
        self.capability_gate
            .as_ref()
            .map_or(true, |gate| gate.include_module(name))
    }
}

fn validate_table(table: &RouteTable) -> Result<()> {
    for (entity_type_id, templates) in table.iter() {
        for template in templates {
            validate_fragment(template).map_err(|source| ResolverError::InvalidTemplate {
                entity_type_id,
                template: template.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> UrlResolver {
        UrlResolver::builder().build().unwrap()
    }

    #[test]
    fn test_lead_list() {
        let resolver = resolver();
        assert!(resolver.is_lead_list(Some("/crm/lead/list/")));
        assert!(!resolver.is_deal_list(Some("/crm/lead/list/")));
    }

    #[test]
    fn test_deal_category_is_deal_list() {
        let resolver = resolver();
        assert!(resolver.is_deal_list(Some("/crm/deal/category/42/")));
        assert!(resolver.is_deal_list(Some("/crm/deal/list/")));
        assert!(!resolver.is_lead_list(Some("/crm/deal/category/42/")));
    }

    #[test]
    fn test_company_detail_needs_numeric_id() {
        let resolver = resolver();
        assert!(resolver.is_company_detail(Some("/crm/company/details/123/")));
        assert!(!resolver.is_company_detail(Some("/crm/company/details/abc/")));
    }

    #[test]
    fn test_pattern_sets_compile_lazily_per_kind() {
        let resolver = resolver();
        assert!(!resolver.is_compiled(PageKind::List));
        assert!(!resolver.is_compiled(PageKind::Detail));

        resolver.is_contact_list(Some("/crm/contact/list/"));
        assert!(resolver.is_compiled(PageKind::List));
        assert!(!resolver.is_compiled(PageKind::Detail));

        resolver.is_contact_detail(Some("/crm/contact/details/1/"));
        assert!(resolver.is_compiled(PageKind::Detail));
    }

    #[test]
    fn test_no_url_does_not_compile() {
        let resolver = resolver();
        assert!(!resolver.is_lead_list(None));
        assert!(!resolver.is_lead_detail(Some("")));
        assert!(!resolver.is_compiled(PageKind::List));
        assert!(!resolver.is_compiled(PageKind::Detail));
    }

    #[test]
    fn test_dynamic_guard_skips_table() {
        let resolver = resolver();
        assert!(!resolver.is_dynamic_type_list(EntityTypeId::LEAD, Some("/crm/lead/list/")));
        assert!(!resolver.is_compiled(PageKind::List));
    }

    #[test]
    fn test_task_pages() {
        let resolver = resolver();
        assert!(resolver.is_tasks_list(Some("/company/personal/user/1/tasks/")));
        assert!(!resolver.is_tasks_list(Some("/company/personal/user/1/tasks/task/view/2/")));
        assert!(resolver.is_task_view(Some("/company/personal/user/1/tasks/task/view/2/")));
        assert!(!resolver.is_task_view(Some("/company/personal/user/x/tasks/task/view/2/")));
        assert!(resolver.is_task_edit(Some("/company/personal/user/5/tasks/task/edit/0/")));
        assert!(!resolver.is_task_view(Some(
            "/company/personal/user/\u{0661}/tasks/task/view/\u{0662}/"
        )));
        assert!(!resolver.is_task_edit(Some(
            "/company/personal/user/1/tasks/task/edit/\u{ff12}/"
        )));
        assert!(!resolver.is_tasks_list(Some("/company/personal/user/\u{0661}/tasks/")));
        assert!(!resolver.is_compiled(PageKind::List));
    }

    #[test]
    fn test_classify() {
        let resolver = resolver();
        assert_eq!(
            resolver.classify(Some("/crm/deal/details/9/")),
            Some(Classification::Entity {
                entity_type_id: EntityTypeId::DEAL,
                kind: PageKind::Detail,
            })
        );
        assert_eq!(
            resolver.classify(Some("/crm/deal/category/3/")),
            Some(Classification::Entity {
                entity_type_id: EntityTypeId::DEAL,
                kind: PageKind::List,
            })
        );
        assert_eq!(
            resolver.classify(Some("/company/personal/user/1/tasks/task/edit/4/")),
            Some(Classification::Task(TaskPage::Edit))
        );
        assert_eq!(resolver.classify(Some("/stream/")), None);
        assert_eq!(resolver.classify(None), None);
    }

    #[test]
    fn test_classification_display() {
        let entity = Classification::Entity {
            entity_type_id: EntityTypeId::LEAD,
            kind: PageKind::List,
        };
        assert_eq!(entity.to_string(), "entity 1 list");
        assert_eq!(Classification::Task(TaskPage::View).to_string(), "task view");
    }

    #[test]
    fn test_invalid_builtin_template_fails_build() {
        let mut config = ResolverConfig::default();
        config.builtin_sections[0].template = "^/crm/(lead/".to_string();
        let err = UrlResolver::builder().config(config).build().unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidTemplate { entity_type_id, .. } if entity_type_id == EntityTypeId::LEAD
        ));
    }

    #[test]
    fn test_invalid_suffix_fails_build() {
        let config = ResolverConfig {
            detail_suffix: r"details/(\d+/".to_string(),
            ..ResolverConfig::default()
        };
        let err = UrlResolver::builder().config(config).build().unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidSuffix {
                kind: PageKind::Detail,
                ..
            }
        ));
    }
}
