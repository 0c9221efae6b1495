//! Entity structs for the Cairn graph and its audit records.
//!
//! Each struct maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod entity;
mod hook_execution;
mod impact;
mod indexed_commit;
mod relationship;

pub use entity::Entity;
pub use hook_execution::HookExecution;
pub use impact::{
    AffectedDecision, AffectedEntity, ChangedFiles, ImpactReport, ImpactReportRecord,
    RelatedContext,
};
pub use indexed_commit::IndexedCommit;
pub use relationship::{DISCOVERED_BY_KEY, Relationship, SEMANTIC_TAG, semantic_metadata};
