use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ChangeType, RiskLevel};

/// Files changed between two refs, grouped by change kind.
///
/// Renames are recorded as a deletion of the old path plus an addition of the new one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChangedFiles {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl ChangedFiles {
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every changed path with its change kind, in added, modified, deleted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeType)> {
        self.added
            .iter()
            .map(|f| (f.as_str(), ChangeType::Added))
            .chain(self.modified.iter().map(|f| (f.as_str(), ChangeType::Modified)))
            .chain(self.deleted.iter().map(|f| (f.as_str(), ChangeType::Deleted)))
    }
}

/// An entity defined in a changed file, with how often it is referenced elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AffectedEntity {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub file_path: String,
    pub change_type: ChangeType,
    pub usage_count: u32,
}

/// A recorded decision whose text mentions a changed file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AffectedDecision {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub related_files: Vec<String>,
    pub might_be_invalidated: bool,
}

/// A context snippet related to the change set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RelatedContext {
    pub source: String,
    pub content: String,
    pub score: Option<f64>,
}

/// Immutable snapshot describing the blast radius of a change set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImpactReport {
    pub generated_at: DateTime<Utc>,
    pub base_branch: String,
    pub target_branch: String,
    pub changed_files: ChangedFiles,
    pub affected_entities: Vec<AffectedEntity>,
    pub affected_decisions: Vec<AffectedDecision>,
    pub related_contexts: Vec<RelatedContext>,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ImpactReport {
    /// `base..target`, as stored in the `commit_range` column.
    #[must_use]
    pub fn commit_range(&self) -> String {
        format!("{}..{}", self.base_branch, self.target_branch)
    }

    /// Multi-line human-readable summary for terminal output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Impact: {} ({})", self.commit_range(), self.risk_level);
        let _ = writeln!(
            out,
            "  files: {} added, {} modified, {} deleted",
            self.changed_files.added.len(),
            self.changed_files.modified.len(),
            self.changed_files.deleted.len()
        );
        let _ = writeln!(
            out,
            "  affected: {} entities, {} decisions",
            self.affected_entities.len(),
            self.affected_decisions.len()
        );
        for reason in &self.reasons {
            let _ = writeln!(out, "  - {reason}");
        }
        for suggestion in &self.suggestions {
            let _ = writeln!(out, "  > {suggestion}");
        }
        out
    }
}

/// A persisted impact report with its row id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImpactReportRecord {
    pub id: String,
    pub project_id: String,
    pub report: ImpactReport,
}
