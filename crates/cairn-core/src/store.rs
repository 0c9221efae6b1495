//! Store capability traits.
//!
//! The graph core never talks to a database directly. Everything it needs from
//! persistent storage goes through [`GraphStore`] (entities and relationships)
//! and [`AuditStore`] (hook executions, impact reports, indexed commits).
//! `cairn-db` provides the libSQL implementation.
//!
//! # Check-then-create
//!
//! Linking code calls [`GraphStore::relationship_exists`] and then
//! [`GraphStore::create_relationship`]. The two calls are not atomic: two
//! concurrent callers can both pass the check for the same pair. Backends
//! should enforce uniqueness of `(source_id, target_id, relationship)` and
//! report a conflicting insert as `Ok(None)` rather than an error.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::entities::{Entity, HookExecution, ImpactReport, ImpactReportRecord, Relationship};
use crate::enums::{Direction, EdgeType, EntityType, HookType};
use crate::errors::StoreError;

/// Fields for inserting or updating an entity, keyed by `qualified_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntity {
    pub entity_type: EntityType,
    pub name: String,
    pub qualified_name: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub file_path: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub metadata: Map<String, Value>,
}

impl NewEntity {
    pub fn new(
        entity_type: EntityType,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            name: name.into(),
            qualified_name: qualified_name.into(),
            content: None,
            summary: None,
            file_path: None,
            start_line: None,
            end_line: None,
            metadata: Map::new(),
        }
    }
}

/// Fields for creating a relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelationship {
    pub source_id: String,
    pub target_id: String,
    pub relationship: EdgeType,
    pub weight: f64,
    pub metadata: Map<String, Value>,
}

/// Filter for listing entities. Results are ordered by `qualified_name`.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    /// Empty means every type.
    pub entity_types: Vec<EntityType>,
    pub file_path: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self {
            entity_types: Vec::new(),
            file_path: None,
            limit: 100,
            offset: 0,
        }
    }
}

/// Entity and relationship persistence.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Insert a new entity or update the one with the same qualified name.
    async fn upsert_entity(&self, entity: &NewEntity) -> Result<Entity, StoreError>;

    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError>;

    async fn find_entity_by_qualified_name(
        &self,
        qualified_name: &str,
    ) -> Result<Option<Entity>, StoreError>;

    async fn list_entities(&self, filter: &EntityFilter) -> Result<Vec<Entity>, StoreError>;

    /// Whether an edge of `relationship` exists from `source_id` to `target_id`.
    /// The check is directional.
    async fn relationship_exists(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: EdgeType,
    ) -> Result<bool, StoreError>;

    /// Create an edge. Returns `None` when an identical edge already exists.
    async fn create_relationship(
        &self,
        relationship: &NewRelationship,
    ) -> Result<Option<Relationship>, StoreError>;

    /// Edges touching `entity_id` in the given direction, optionally of one type.
    async fn relationships_for(
        &self,
        entity_id: &str,
        direction: Direction,
        relationship: Option<EdgeType>,
    ) -> Result<Vec<Relationship>, StoreError>;

    async fn relationships_by_type(
        &self,
        relationship: EdgeType,
    ) -> Result<Vec<Relationship>, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete_relationship(&self, id: &str) -> Result<bool, StoreError>;
}

/// Hook audit trail, impact reports, and index freshness records.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Generate a prefixed id, e.g. `hke-a3f8b2c1`.
    async fn generate_id(&self, prefix: &str) -> Result<String, StoreError>;

    async fn record_hook_execution(&self, execution: &HookExecution) -> Result<(), StoreError>;

    /// Most recent first.
    async fn list_hook_executions(
        &self,
        project_id: &str,
        hook_type: Option<HookType>,
        limit: u32,
    ) -> Result<Vec<HookExecution>, StoreError>;

    /// Persist a report and return its id.
    async fn save_impact_report(
        &self,
        project_id: &str,
        report: &ImpactReport,
    ) -> Result<String, StoreError>;

    /// Most recent first.
    async fn list_impact_reports(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<ImpactReportRecord>, StoreError>;

    async fn mark_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
        file_count: u32,
    ) -> Result<(), StoreError>;

    async fn is_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
    ) -> Result<bool, StoreError>;
}
