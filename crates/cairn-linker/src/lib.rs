//! # cairn-linker
//!
//! Embedding-driven semantic relationship discovery.
//!
//! [`SemanticLinker`] finds entities whose text is similar and connects
//! them with weighted edges (`RELATES_TO` by default) tagged
//! `discoveredBy: "semantic"`. The tag is what lets [`SemanticLinker::update_links`]
//! and [`SemanticLinker::prune_weak_links`] touch only edges the linker made.
//!
//! Similarity is a capability: anything implementing [`SimilaritySearch`]
//! works. [`VectorSimilarity`] is the local implementation over fastembed
//! vectors stored in libSQL.

pub mod error;
mod linker;
pub mod options;
pub mod similarity;

pub use error::{LinkerError, SimilarityError};
pub use linker::SemanticLinker;
pub use options::{
    BatchProgress, BatchResult, DiscoverOptions, DiscoverProgress, DiscoverResult, LinkOptions,
    LinkResult, RelatedOptions, SemanticLinksOptions, Suggestion, SuggestionOptions, UpdateResult,
};
pub use similarity::{SimilarityMatch, SimilarityOptions, SimilaritySearch, VectorSimilarity};
