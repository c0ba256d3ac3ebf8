//! Error types for building the classifier.

use crm_entity::{EntityError, EntityTypeId};
use thiserror::Error;

use crate::pattern::PageKind;

/// Errors raised while building a classifier or loading its configuration.
///
/// Classification queries themselves never fail.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// A base template is not a valid regex fragment.
    #[error("invalid template {template:?} for entity type {entity_type_id}: {source}")]
    InvalidTemplate {
        /// Entity type the template was registered for.
        entity_type_id: EntityTypeId,
        /// The offending template.
        template: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A page kind suffix is not a valid regex fragment.
    #[error("invalid {kind} suffix: {source}")]
    InvalidSuffix {
        /// Page kind the suffix belongs to.
        kind: PageKind,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A collaborator failed while the route table was being built.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] EntityError),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for classifier construction.
pub type Result<T> = std::result::Result<T, ResolverError>;
