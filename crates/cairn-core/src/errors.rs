//! Cross-cutting error types for Cairn.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `LinkerError`) are defined in
//! their respective crates. `StoreError` is the error surface of the store
//! traits, so every backend converts into it.

use thiserror::Error;

/// Errors that can be raised by any Cairn crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors returned through the `GraphStore` and `AuditStore` traits.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The backend failed to execute the operation.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
