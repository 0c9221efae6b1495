//! Hook input and output shapes.

use cairn_core::enums::HookType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HookError;

/// One git hook invocation, as handed to [`HookHandler::handle`](crate::HookHandler::handle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookEvent {
    #[serde(rename = "type")]
    pub hook_type: HookType,
    pub timestamp: DateTime<Utc>,
    /// Repository root path.
    pub repository: String,
    pub current_branch: String,
    pub current_commit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_files: Option<Vec<String>>,
}

impl HookEvent {
    pub fn new(
        hook_type: HookType,
        repository: impl Into<String>,
        current_branch: impl Into<String>,
        current_commit: impl Into<String>,
    ) -> Self {
        Self {
            hook_type,
            timestamp: Utc::now(),
            repository: repository.into(),
            current_branch: current_branch.into(),
            current_commit: current_commit.into(),
            previous_commit: None,
            staged_files: None,
            merged_files: None,
        }
    }

    /// Parse an event from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Json`] if the payload does not match the event shape.
    pub fn from_json(raw: &str) -> Result<Self, HookError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// What a hook invocation did. Also the source of the audit row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResult {
    pub success: bool,
    pub message: String,
    pub duration_ms: u64,
    pub files_indexed: u32,
    pub entities_updated: u32,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    /// Set when post-merge persisted an impact report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_report_id: Option<String>,
}

impl HookResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn failed(error: &HookError) -> Self {
        let message = error.to_string();
        Self {
            success: false,
            errors: vec![message.clone()],
            message,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
