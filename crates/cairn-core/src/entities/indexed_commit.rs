use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A commit whose changed files were sent for re-indexing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IndexedCommit {
    pub project_id: String,
    pub commit_hash: String,
    pub indexed_at: DateTime<Utc>,
    pub file_count: u32,
}
