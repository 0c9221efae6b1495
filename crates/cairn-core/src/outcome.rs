//! Outcome types for operations that report partial failure.
//!
//! Batch operations never abort on a single bad item. Each failure is
//! recorded as an [`Issue`] tagged with a [`Severity`], and the caller
//! inspects the accumulated list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether a failure left the surrounding operation usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// One item was skipped; the rest of the batch is valid.
    Recoverable,
    /// The operation could not produce a meaningful result.
    Fatal,
}

/// One failure recorded during a batch operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    /// What was being processed, usually an entity id.
    pub context: String,
    pub message: String,
}

impl Issue {
    pub fn recoverable(context: impl Into<String>, message: impl ToString) -> Self {
        Self {
            severity: Severity::Recoverable,
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn fatal(context: impl Into<String>, message: impl ToString) -> Self {
        Self {
            severity: Severity::Fatal,
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Whether any issue in the list is fatal.
#[must_use]
pub fn has_fatal(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Fatal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_detection() {
        let mut issues = vec![Issue::recoverable("ent-1", "similarity search timed out")];
        assert!(!has_fatal(&issues));
        issues.push(Issue::fatal("ent-2", "entity not found"));
        assert!(has_fatal(&issues));
    }
}
