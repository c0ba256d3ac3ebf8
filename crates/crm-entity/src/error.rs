//! Error types for entity type lookups.

use thiserror::Error;

/// Errors raised by the entity helpers and their collaborators.
#[derive(Debug, Error)]
pub enum EntityError {
    /// A module required by the helper is not available.
    #[error("module {0} not included")]
    ModuleNotIncluded(String),

    /// No entity type matched the lookup key.
    #[error("entity type {0} not found")]
    EntityTypeNotFound(String),

    /// The record store failed to supply rows.
    #[error("record store error: {0}")]
    Store(String),
}

/// Result type alias for entity operations.
pub type Result<T> = std::result::Result<T, EntityError>;
