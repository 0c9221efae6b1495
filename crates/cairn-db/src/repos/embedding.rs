//! Entity embedding storage and brute-force nearest-neighbour search.
//!
//! Vectors are stored as little-endian `f32` blobs. Search loads every
//! candidate vector and scores it in process, which is fine for the graph
//! sizes a single repository produces.

use cairn_core::entities::Entity;
use cairn_core::enums::EntityType;
use chrono::Utc;

use crate::GraphDb;
use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::repos::entity::{ENTITY_COLUMNS, row_to_entity};

/// Cosine similarity of two vectors. Returns 0.0 for mismatched lengths
/// or a zero vector.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>, DatabaseError> {
    if bytes.len() % 4 != 0 {
        return Err(DatabaseError::Query(format!(
            "embedding blob of {} bytes is not a whole number of f32s",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

impl GraphDb {
    /// Store or replace the embedding for an entity.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the entity does not exist or the write fails.
    pub async fn save_embedding(
        &self,
        entity_id: &str,
        model: &str,
        vector: &[f32],
    ) -> Result<(), DatabaseError> {
        let dimensions = i64::try_from(vector.len())
            .map_err(|e| DatabaseError::Query(format!("embedding dimensions: {e}")))?;
        self.conn()
            .execute(
                "INSERT INTO entity_embeddings (entity_id, model, dimensions, vector, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(entity_id) DO UPDATE SET
                     model = excluded.model,
                     dimensions = excluded.dimensions,
                     vector = excluded.vector,
                     updated_at = excluded.updated_at",
                libsql::params![
                    entity_id,
                    model,
                    dimensions,
                    encode_vector(vector),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the blob is malformed.
    pub async fn get_embedding(&self, entity_id: &str) -> Result<Option<Vec<f32>>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT vector FROM entity_embeddings WHERE entity_id = ?1",
                [entity_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(decode_vector(&row.get::<Vec<u8>>(0)?)?)),
            None => Ok(None),
        }
    }

    /// Entities whose embedding scores at least `min_score` against `query`,
    /// best first, at most `limit`. An empty `types` slice means every type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a blob is malformed.
    pub async fn nearest_entities(
        &self,
        query: &[f32],
        types: &[EntityType],
        limit: usize,
        min_score: f64,
    ) -> Result<Vec<(Entity, f64)>, DatabaseError> {
        let columns = ENTITY_COLUMNS
            .split(", ")
            .map(|c| format!("e.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let type_clause = if types.is_empty() {
            String::new()
        } else {
            format!("WHERE e.entity_type IN ({})", placeholders(types.len(), 0))
        };
        let params: Vec<libsql::Value> = types
            .iter()
            .map(|t| libsql::Value::Text(t.as_str().to_string()))
            .collect();

        let sql = format!(
            "SELECT {columns}, v.vector FROM entity_embeddings v
             JOIN entities e ON e.id = v.entity_id {type_clause}"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let vector_idx = i32::try_from(ENTITY_COLUMNS.split(", ").count())
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let mut scored = Vec::new();
        while let Some(row) = rows.next().await? {
            let vector = decode_vector(&row.get::<Vec<u8>>(vector_idx)?)?;
            let score = cosine_similarity(query, &vector);
            if score >= min_score {
                scored.push((row_to_entity(&row)?, score));
            }
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        scored.truncate(limit);
        Ok(scored)
    }

    /// Entities of the given types (empty means all) that have no stored
    /// embedding, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn entities_without_embedding(
        &self,
        types: &[EntityType],
        limit: u32,
    ) -> Result<Vec<Entity>, DatabaseError> {
        let columns = ENTITY_COLUMNS
            .split(", ")
            .map(|c| format!("e.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let type_clause = if types.is_empty() {
            String::new()
        } else {
            format!("AND e.entity_type IN ({})", placeholders(types.len(), 0))
        };
        let mut params: Vec<libsql::Value> = types
            .iter()
            .map(|t| libsql::Value::Text(t.as_str().to_string()))
            .collect();
        params.push(libsql::Value::Integer(i64::from(limit)));

        let sql = format!(
            "SELECT {columns} FROM entities e
             LEFT JOIN entity_embeddings v ON v.entity_id = e.id
             WHERE v.entity_id IS NULL {type_clause}
             ORDER BY e.created_at, e.rowid
             LIMIT ?{}",
            types.len() + 1
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next().await? {
            entities.push(row_to_entity(&row)?);
        }
        Ok(entities)
    }
}
