//! # cairn-hooks
//!
//! Git hook handling and change impact analysis for Cairn.
//!
//! - [`HookHandler`] dispatches `pre-commit`, `post-merge`, `pre-push` and
//!   `post-checkout` events, and writes one audit row per invocation.
//! - [`ImpactAnalyzer`] turns the diff between two refs into an
//!   [`ImpactReport`](cairn_core::entities::ImpactReport) with a risk score.
//! - [`ToolClient`] is the external capability used for indexing and
//!   entity/decision lookups. [`HttpToolClient`] talks to it over HTTP.
//!
//! Repository reads (HEAD, tree diffs) go through `gix`. Staged and merged
//! file lists come from the git CLI, since that is what hooks run under.

pub mod error;
pub mod event;
pub mod git;
pub mod handler;
pub mod impact;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use error::{HookError, ToolError};
pub use event::{HookEvent, HookResult};
pub use handler::HookHandler;
pub use impact::{AnalyzeOptions, ImpactAnalyzer, RiskAssessment};
pub use tools::{HttpToolClient, ToolClient};
