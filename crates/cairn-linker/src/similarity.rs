//! Similarity search capability and its embedding-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use cairn_core::entities::Entity;
use cairn_core::enums::EntityType;
use cairn_db::GraphDb;
use cairn_embeddings::Embedder;
use serde::Serialize;

use crate::error::SimilarityError;

/// Query parameters for [`SimilaritySearch::find_similar`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityOptions {
    pub limit: usize,
    pub min_similarity: f64,
    /// Empty means every type.
    pub entity_types: Vec<EntityType>,
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub entity_id: String,
    pub name: String,
    pub entity_type: EntityType,
    pub similarity: f64,
}

/// Ranked text-to-entity similarity lookup.
///
/// Implementations return matches best first, all scoring at least
/// `min_similarity`, at most `limit` of them. The querying entity itself
/// may be among the results; callers filter it.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn find_similar(
        &self,
        text: &str,
        opts: &SimilarityOptions,
    ) -> Result<Vec<SimilarityMatch>, SimilarityError>;
}

/// Embeds the query text and ranks stored entity embeddings by cosine similarity.
pub struct VectorSimilarity<E> {
    db: Arc<GraphDb>,
    embedder: E,
}

impl<E: Embedder> VectorSimilarity<E> {
    pub const fn new(db: Arc<GraphDb>, embedder: E) -> Self {
        Self { db, embedder }
    }

    /// Embed an entity's seed text and store the vector.
    ///
    /// # Errors
    ///
    /// Returns `SimilarityError` if embedding or the write fails.
    pub async fn index_entity(&self, entity: &Entity) -> Result<(), SimilarityError> {
        let vector = self.embedder.embed_one(entity.seed_text()).await?;
        self.db
            .save_embedding(&entity.id, self.embedder.model_name(), &vector)
            .await?;
        Ok(())
    }

    /// Embed several entities in one batch. Returns how many were stored.
    ///
    /// # Errors
    ///
    /// Returns `SimilarityError` if embedding fails or a write fails.
    pub async fn index_entities(&self, entities: &[Entity]) -> Result<usize, SimilarityError> {
        if entities.is_empty() {
            return Ok(0);
        }
        let texts = entities.iter().map(|e| e.seed_text().to_string()).collect();
        let vectors = self.embedder.embed(texts).await?;
        if vectors.len() != entities.len() {
            return Err(SimilarityError::Backend(format!(
                "embedder returned {} vectors for {} entities",
                vectors.len(),
                entities.len()
            )));
        }
        for (entity, vector) in entities.iter().zip(&vectors) {
            self.db
                .save_embedding(&entity.id, self.embedder.model_name(), vector)
                .await?;
        }
        tracing::debug!(count = entities.len(), "indexed entity embeddings");
        Ok(entities.len())
    }
}

#[async_trait]
impl<E: Embedder> SimilaritySearch for VectorSimilarity<E> {
    async fn find_similar(
        &self,
        text: &str,
        opts: &SimilarityOptions,
    ) -> Result<Vec<SimilarityMatch>, SimilarityError> {
        let query = self.embedder.embed_one(text).await?;
        let hits = self
            .db
            .nearest_entities(&query, &opts.entity_types, opts.limit, opts.min_similarity)
            .await?;
        Ok(hits
            .into_iter()
            .map(|(entity, similarity)| SimilarityMatch {
                entity_id: entity.id,
                name: entity.name,
                entity_type: entity.entity_type,
                similarity,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::store::NewEntity;
    use cairn_embeddings::EmbeddingError;
    use pretty_assertions::assert_eq;

    /// Maps known words to fixed 2-d vectors.
    struct WordEmbedder;

    fn vector_for(text: &str) -> Vec<f32> {
        match text {
            t if t.contains("cache") => vec![1.0, 0.0],
            t if t.contains("memo") => vec![0.9, 0.1],
            _ => vec![0.0, 1.0],
        }
    }

    #[async_trait]
    impl Embedder for WordEmbedder {
        async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|t| vector_for(t)).collect())
        }

        fn model_name(&self) -> &str {
            "words"
        }
    }

    async fn concept(db: &GraphDb, name: &str) -> Entity {
        db.upsert_entity(&NewEntity::new(EntityType::Concept, name, format!("concept:{name}")))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn indexes_and_ranks_by_cosine() {
        let db = Arc::new(GraphDb::open_local(":memory:").await.unwrap());
        let cache = concept(&db, "cache").await;
        let memo = concept(&db, "memoization").await;
        let logging = concept(&db, "logging").await;

        let search = VectorSimilarity::new(Arc::clone(&db), WordEmbedder);
        assert_eq!(
            search.index_entities(&[cache.clone(), memo.clone()]).await.unwrap(),
            2
        );
        search.index_entity(&logging).await.unwrap();

        let opts = SimilarityOptions {
            limit: 5,
            min_similarity: 0.5,
            entity_types: vec![EntityType::Concept],
        };
        let matches = search.find_similar("cache layer", &opts).await.unwrap();
        let ids: Vec<_> = matches.iter().map(|m| m.entity_id.as_str()).collect();
        assert_eq!(ids, vec![cache.id.as_str(), memo.id.as_str()]);
        assert!(matches[0].similarity > matches[1].similarity);
    }
}
