//! Options and results for [`SemanticLinker`](crate::SemanticLinker) operations.

use cairn_core::entities::Relationship;
use cairn_core::enums::{Direction, EdgeType, EntityType};
use cairn_core::outcome::Issue;
use serde::Serialize;

/// Options for a whole-graph discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverOptions {
    /// Types scanned, and the candidate types matches are drawn from.
    pub entity_types: Vec<EntityType>,
    pub min_similarity: f64,
    pub max_per_entity: usize,
    pub relationship: EdgeType,
    /// Skip entities that already have an outgoing edge of `relationship`.
    pub skip_existing: bool,
    /// Page size when listing entities.
    pub batch_size: u32,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            entity_types: EntityType::DISCOVERY_DEFAULTS.to_vec(),
            min_similarity: 0.75,
            max_per_entity: 5,
            relationship: EdgeType::SEMANTIC_DEFAULT,
            skip_existing: true,
            batch_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoverResult {
    pub created: u32,
    pub entities_processed: u32,
    pub entities_skipped: u32,
    pub issues: Vec<Issue>,
}

/// Reported after each entity of a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverProgress {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub processed: u32,
    pub skipped: u32,
    pub created: u32,
}

/// Options for linking a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOptions {
    pub max_links: usize,
    pub min_similarity: f64,
    /// Also create `target -> source` edges.
    pub bidirectional: bool,
    pub relationship: EdgeType,
    /// Candidate types. `None` means every type.
    pub entity_types: Option<Vec<EntityType>>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            max_links: 5,
            min_similarity: 0.75,
            bidirectional: false,
            relationship: EdgeType::SEMANTIC_DEFAULT,
            entity_types: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkResult {
    /// Outgoing plus incoming edges created.
    pub created: u32,
    pub outgoing: Vec<Relationship>,
    pub incoming: Vec<Relationship>,
    pub issues: Vec<Issue>,
}

/// Options for read-only similarity queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedOptions {
    pub limit: usize,
    pub min_similarity: f64,
    /// `None` means every type, except for concept lookups which default to
    /// concept, technology and pattern.
    pub entity_types: Option<Vec<EntityType>>,
}

impl Default for RelatedOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.7,
            entity_types: None,
        }
    }
}

/// Filter for [`SemanticLinker::get_semantic_links`](crate::SemanticLinker::get_semantic_links).
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticLinksOptions {
    pub direction: Direction,
    pub min_weight: Option<f64>,
    pub relationship: EdgeType,
}

impl Default for SemanticLinksOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Both,
            min_weight: None,
            relationship: EdgeType::SEMANTIC_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateResult {
    pub removed: u32,
    pub created: u32,
    pub issues: Vec<Issue>,
}

/// Options for [`SemanticLinker::get_suggestions`](crate::SemanticLinker::get_suggestions).
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOptions {
    pub limit: usize,
    pub min_similarity: f64,
    pub relationship: EdgeType,
    pub entity_types: Option<Vec<EntityType>>,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.6,
            relationship: EdgeType::SEMANTIC_DEFAULT,
            entity_types: None,
        }
    }
}

/// A link that could be created, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub target_id: String,
    pub target_name: String,
    pub target_type: EntityType,
    pub similarity: f64,
    pub reason: String,
}

/// Reported after each entity of a batch link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub entity_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    /// Entities attempted, including failures.
    pub processed: u32,
    pub created: u32,
    pub failed: u32,
    pub issues: Vec<Issue>,
}

/// Similarity band wording used in suggestion reasons.
#[must_use]
pub fn similarity_band(similarity: f64) -> &'static str {
    if similarity >= 0.9 {
        "Very similar"
    } else if similarity >= 0.8 {
        "Similar"
    } else if similarity >= 0.7 {
        "Related"
    } else {
        "Possibly related"
    }
}
