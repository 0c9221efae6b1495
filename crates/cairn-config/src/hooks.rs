//! Git hook behaviour.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

const fn default_max_files_to_index() -> usize {
    100
}

const fn default_large_checkout_threshold() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HookConfig {
    /// Send staged files for indexing on pre-commit.
    #[serde(default = "default_true")]
    pub index_on_commit: bool,

    /// Re-index merged files on post-merge.
    #[serde(default = "default_true")]
    pub sync_on_merge: bool,

    /// Run impact analysis on post-merge.
    #[serde(default = "default_true")]
    pub generate_impact_report: bool,

    /// Block pushes when the index is stale.
    #[serde(default)]
    pub validate_on_push: bool,

    /// Above this many files, indexing is skipped with a warning.
    #[serde(default = "default_max_files_to_index")]
    pub max_files_to_index: usize,

    /// A branch switch touching more files than this produces a warning.
    #[serde(default = "default_large_checkout_threshold")]
    pub large_checkout_threshold: usize,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            index_on_commit: true,
            sync_on_merge: true,
            generate_impact_report: true,
            validate_on_push: false,
            max_files_to_index: default_max_files_to_index(),
            large_checkout_threshold: default_large_checkout_threshold(),
        }
    }
}
