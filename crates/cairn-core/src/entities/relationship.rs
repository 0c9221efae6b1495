use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::EdgeType;

/// Metadata key marking who created an edge.
pub const DISCOVERED_BY_KEY: &str = "discoveredBy";

/// Value of [`DISCOVERED_BY_KEY`] on edges created from embedding similarity.
pub const SEMANTIC_TAG: &str = "semantic";

/// A directed, typed, weighted edge between two entities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relationship: EdgeType,
    pub weight: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    /// Whether this edge was created by semantic linking rather than by hand
    /// or by structural extraction.
    #[must_use]
    pub fn is_semantic(&self) -> bool {
        self.metadata.get(DISCOVERED_BY_KEY).and_then(Value::as_str) == Some(SEMANTIC_TAG)
    }
}

/// Metadata attached to every semantic edge.
#[must_use]
pub fn semantic_metadata(similarity: f64) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(DISCOVERED_BY_KEY.into(), Value::String(SEMANTIC_TAG.into()));
    map.insert("similarity".into(), Value::from(similarity));
    map
}
