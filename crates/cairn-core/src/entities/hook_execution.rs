use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::HookType;

/// Audit record of one hook invocation. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HookExecution {
    pub id: String,
    pub project_id: String,
    pub hook_type: HookType,
    pub timestamp: DateTime<Utc>,
    pub repository: String,
    pub branch: Option<String>,
    pub commit_hash: Option<String>,
    pub duration_ms: u64,
    pub success: bool,
    pub files_indexed: u32,
    pub entities_updated: u32,
    pub message: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}
