//! Semantic linking defaults.

use cairn_core::enums::{EdgeType, EntityType};
use serde::{Deserialize, Serialize};

const fn default_min_similarity() -> f64 {
    0.75
}

const fn default_max_per_entity() -> usize {
    5
}

const fn default_max_links() -> usize {
    5
}

const fn default_prune_threshold() -> f64 {
    0.6
}

fn default_entity_types() -> Vec<EntityType> {
    EntityType::DISCOVERY_DEFAULTS.to_vec()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkerConfig {
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    #[serde(default = "default_max_per_entity")]
    pub max_per_entity: usize,

    #[serde(default = "default_max_links")]
    pub max_links: usize,

    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: f64,

    /// Tag written on similarity edges.
    #[serde(default)]
    pub relationship: EdgeType,

    /// Entity types scanned by discovery.
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<EntityType>,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            max_per_entity: default_max_per_entity(),
            max_links: default_max_links(),
            prune_threshold: default_prune_threshold(),
            relationship: EdgeType::default(),
            entity_types: default_entity_types(),
        }
    }
}
