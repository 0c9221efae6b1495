//! `GraphStore` and `AuditStore` for `GraphDb`: thin delegation to the repos.

use async_trait::async_trait;
use cairn_core::entities::{Entity, HookExecution, ImpactReport, ImpactReportRecord, Relationship};
use cairn_core::enums::{Direction, EdgeType, HookType};
use cairn_core::errors::StoreError;
use cairn_core::store::{AuditStore, EntityFilter, GraphStore, NewEntity, NewRelationship};

use crate::GraphDb;

#[async_trait]
impl GraphStore for GraphDb {
    async fn upsert_entity(&self, entity: &NewEntity) -> Result<Entity, StoreError> {
        Ok(Self::upsert_entity(self, entity).await?)
    }

    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        Ok(Self::get_entity(self, id).await?)
    }

    async fn find_entity_by_qualified_name(
        &self,
        qualified_name: &str,
    ) -> Result<Option<Entity>, StoreError> {
        Ok(Self::find_entity_by_qualified_name(self, qualified_name).await?)
    }

    async fn list_entities(&self, filter: &EntityFilter) -> Result<Vec<Entity>, StoreError> {
        Ok(Self::list_entities(self, filter).await?)
    }

    async fn relationship_exists(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: EdgeType,
    ) -> Result<bool, StoreError> {
        Ok(Self::relationship_exists(self, source_id, target_id, relationship).await?)
    }

    async fn create_relationship(
        &self,
        relationship: &NewRelationship,
    ) -> Result<Option<Relationship>, StoreError> {
        Ok(Self::create_relationship(self, relationship).await?)
    }

    async fn relationships_for(
        &self,
        entity_id: &str,
        direction: Direction,
        relationship: Option<EdgeType>,
    ) -> Result<Vec<Relationship>, StoreError> {
        Ok(Self::relationships_for(self, entity_id, direction, relationship).await?)
    }

    async fn relationships_by_type(
        &self,
        relationship: EdgeType,
    ) -> Result<Vec<Relationship>, StoreError> {
        Ok(Self::relationships_by_type(self, relationship).await?)
    }

    async fn delete_relationship(&self, id: &str) -> Result<bool, StoreError> {
        Ok(Self::delete_relationship(self, id).await?)
    }
}

#[async_trait]
impl AuditStore for GraphDb {
    async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        Ok(Self::generate_id(self, prefix).await?)
    }

    async fn record_hook_execution(&self, execution: &HookExecution) -> Result<(), StoreError> {
        Ok(Self::record_hook_execution(self, execution).await?)
    }

    async fn list_hook_executions(
        &self,
        project_id: &str,
        hook_type: Option<HookType>,
        limit: u32,
    ) -> Result<Vec<HookExecution>, StoreError> {
        Ok(Self::list_hook_executions(self, project_id, hook_type, limit).await?)
    }

    async fn save_impact_report(
        &self,
        project_id: &str,
        report: &ImpactReport,
    ) -> Result<String, StoreError> {
        Ok(Self::save_impact_report(self, project_id, report).await?)
    }

    async fn list_impact_reports(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<ImpactReportRecord>, StoreError> {
        Ok(Self::list_impact_reports(self, project_id, limit).await?)
    }

    async fn mark_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
        file_count: u32,
    ) -> Result<(), StoreError> {
        Ok(Self::mark_commit_indexed(self, project_id, commit_hash, file_count).await?)
    }

    async fn is_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
    ) -> Result<bool, StoreError> {
        Ok(Self::is_commit_indexed(self, project_id, commit_hash).await?)
    }
}
