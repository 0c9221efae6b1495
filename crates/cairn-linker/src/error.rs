//! Linker error types.

use cairn_core::errors::StoreError;
use cairn_db::DatabaseError;
use cairn_embeddings::EmbeddingError;
use thiserror::Error;

/// Errors from a similarity backend.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector lookup failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Similarity search failed: {0}")]
    Backend(String),
}

/// Errors that stop a linker operation outright.
///
/// Per-entity failures inside a batch are reported as
/// [`Issue`](cairn_core::outcome::Issue)s instead.
#[derive(Debug, Error)]
pub enum LinkerError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}
