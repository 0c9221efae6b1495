//! Relationship repository: create-if-absent, existence checks, directional queries.

use cairn_core::entities::Relationship;
use cairn_core::enums::{Direction, EdgeType};
use cairn_core::ids::PREFIX_RELATIONSHIP;
use cairn_core::store::NewRelationship;
use chrono::Utc;

use crate::GraphDb;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_edge_type, parse_json_map};

const RELATIONSHIP_COLUMNS: &str =
    "id, source_id, target_id, relationship, weight, metadata, created_at";

fn row_to_relationship(row: &libsql::Row) -> Result<Relationship, DatabaseError> {
    Ok(Relationship {
        id: row.get::<String>(0)?,
        source_id: row.get::<String>(1)?,
        target_id: row.get::<String>(2)?,
        relationship: parse_edge_type(&row.get::<String>(3)?)?,
        weight: row.get::<f64>(4)?,
        metadata: parse_json_map(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl GraphDb {
    /// Create an edge unless one with the same `(source, target, type)` exists.
    ///
    /// Returns `None` on conflict. The UNIQUE constraint makes this safe
    /// under concurrent callers; the loser simply creates nothing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails for any other reason,
    /// e.g. an endpoint entity does not exist.
    pub async fn create_relationship(
        &self,
        new: &NewRelationship,
    ) -> Result<Option<Relationship>, DatabaseError> {
        let id = self.generate_id(PREFIX_RELATIONSHIP).await?;
        let now = Utc::now();
        let metadata = serde_json::to_string(&new.metadata)?;

        let inserted = self
            .conn()
            .execute(
                "INSERT INTO relationships (id, source_id, target_id, relationship, weight, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(source_id, target_id, relationship) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    new.source_id.as_str(),
                    new.target_id.as_str(),
                    new.relationship.as_str(),
                    new.weight,
                    metadata,
                    now.to_rfc3339()
                ],
            )
            .await?;

        if inserted == 0 {
            tracing::debug!(
                source = %new.source_id,
                target = %new.target_id,
                relationship = %new.relationship,
                "relationship already exists"
            );
            return Ok(None);
        }

        Ok(Some(Relationship {
            id,
            source_id: new.source_id.clone(),
            target_id: new.target_id.clone(),
            relationship: new.relationship,
            weight: new.weight,
            metadata: new.metadata.clone(),
            created_at: now,
        }))
    }

    /// Directional existence check: `source -> target` only.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn relationship_exists(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: EdgeType,
    ) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM relationships
                 WHERE source_id = ?1 AND target_id = ?2 AND relationship = ?3 LIMIT 1",
                libsql::params![source_id, target_id, relationship.as_str()],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Edges touching an entity, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn relationships_for(
        &self,
        entity_id: &str,
        direction: Direction,
        relationship: Option<EdgeType>,
    ) -> Result<Vec<Relationship>, DatabaseError> {
        let endpoint = match direction {
            Direction::Out => "source_id = ?1",
            Direction::In => "target_id = ?1",
            Direction::Both => "(source_id = ?1 OR target_id = ?1)",
        };
        let mut params = vec![libsql::Value::Text(entity_id.to_string())];
        let type_clause = relationship.map_or(String::new(), |r| {
            params.push(libsql::Value::Text(r.as_str().to_string()));
            " AND relationship = ?2".to_string()
        });

        let sql = format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
             WHERE {endpoint}{type_clause}
             ORDER BY created_at, rowid"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        collect_relationships(&mut rows).await
    }

    /// Every edge of one type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn relationships_by_type(
        &self,
        relationship: EdgeType,
    ) -> Result<Vec<Relationship>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
                     WHERE relationship = ?1 ORDER BY created_at, rowid"
                ),
                [relationship.as_str()],
            )
            .await?;
        collect_relationships(&mut rows).await
    }

    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_relationship(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn()
            .execute("DELETE FROM relationships WHERE id = ?1", [id])
            .await?;
        Ok(deleted > 0)
    }
}

async fn collect_relationships(rows: &mut libsql::Rows) -> Result<Vec<Relationship>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_relationship(&row)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_entity, test_db};
    use cairn_core::entities::semantic_metadata;
    use cairn_core::enums::{EntityType, GraphRelation, RelationshipType};
    use pretty_assertions::assert_eq;

    fn edge(source: &str, target: &str, relationship: EdgeType) -> NewRelationship {
        NewRelationship {
            source_id: source.into(),
            target_id: target.into(),
            relationship,
            weight: 1.0,
            metadata: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn create_and_exists_is_directional() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Function, "a").await;
        let b = seed_entity(&db, EntityType::Function, "b").await;
        let relates = EdgeType::SEMANTIC_DEFAULT;

        let created = db
            .create_relationship(&edge(&a.id, &b.id, relates))
            .await
            .unwrap()
            .unwrap();
        assert!(created.id.starts_with("rel-"));

        assert!(db.relationship_exists(&a.id, &b.id, relates).await.unwrap());
        assert!(!db.relationship_exists(&b.id, &a.id, relates).await.unwrap());
        assert!(
            !db.relationship_exists(&a.id, &b.id, RelationshipType::Calls.into())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_create_is_a_no_op() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Function, "a").await;
        let b = seed_entity(&db, EntityType::Function, "b").await;
        let new = edge(&a.id, &b.id, EdgeType::SEMANTIC_DEFAULT);

        assert!(db.create_relationship(&new).await.unwrap().is_some());
        assert!(db.create_relationship(&new).await.unwrap().is_none());
        assert_eq!(
            db.relationships_by_type(EdgeType::SEMANTIC_DEFAULT)
                .await
                .unwrap()
                .len(),
            1
        );

        // A different type between the same pair is a different edge.
        let calls = edge(&a.id, &b.id, RelationshipType::Calls.into());
        assert!(db.create_relationship(&calls).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dangling_endpoint_is_an_error() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Function, "a").await;
        let result = db
            .create_relationship(&edge(&a.id, "ent-nowhere", EdgeType::SEMANTIC_DEFAULT))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn relationships_for_filters_direction_and_type() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Function, "a").await;
        let b = seed_entity(&db, EntityType::Function, "b").await;
        let c = seed_entity(&db, EntityType::Function, "c").await;
        let relates = EdgeType::SEMANTIC_DEFAULT;
        let mentions = EdgeType::Graph(GraphRelation::Mentions);

        db.create_relationship(&edge(&a.id, &b.id, relates)).await.unwrap();
        db.create_relationship(&edge(&c.id, &a.id, relates)).await.unwrap();
        db.create_relationship(&edge(&a.id, &c.id, mentions)).await.unwrap();

        let out = db.relationships_for(&a.id, Direction::Out, Some(relates)).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target_id, b.id);

        let incoming = db.relationships_for(&a.id, Direction::In, None).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].source_id, c.id);

        let both = db.relationships_for(&a.id, Direction::Both, None).await.unwrap();
        assert_eq!(both.len(), 3);
    }

    #[tokio::test]
    async fn metadata_and_weight_persist() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Concept, "a").await;
        let b = seed_entity(&db, EntityType::Concept, "b").await;
        let mut new = edge(&a.id, &b.id, EdgeType::SEMANTIC_DEFAULT);
        new.weight = 0.82;
        new.metadata = semantic_metadata(0.82);
        db.create_relationship(&new).await.unwrap();

        let stored = &db.relationships_for(&a.id, Direction::Out, None).await.unwrap()[0];
        assert!((stored.weight - 0.82).abs() < 1e-9);
        assert!(stored.is_semantic());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let db = test_db().await;
        let a = seed_entity(&db, EntityType::Function, "a").await;
        let b = seed_entity(&db, EntityType::Function, "b").await;
        let rel = db
            .create_relationship(&edge(&a.id, &b.id, EdgeType::SEMANTIC_DEFAULT))
            .await
            .unwrap()
            .unwrap();
        assert!(db.delete_relationship(&rel.id).await.unwrap());
        assert!(!db.delete_relationship(&rel.id).await.unwrap());
    }
}
