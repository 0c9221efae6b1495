//! Repository methods on [`GraphDb`](crate::GraphDb), one module per table.

pub mod embedding;
pub mod entity;
pub mod hook_execution;
pub mod impact_report;
pub mod indexed_commit;
pub mod ingest;
pub mod relationship;
