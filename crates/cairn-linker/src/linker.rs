//! The semantic linker.
//!
//! Every operation processes entities one at a time, in listing order, so
//! edge creation order is deterministic for a given store and similarity
//! backend. Edge creation is a check followed by a create; see
//! [`GraphStore`] for why that is safe against a backend with a
//! uniqueness constraint.

use std::collections::HashSet;
use std::sync::Arc;

use cairn_core::entities::{Entity, Relationship, semantic_metadata};
use cairn_core::enums::{Direction, EdgeType, EntityType};
use cairn_core::errors::StoreError;
use cairn_core::outcome::Issue;
use cairn_core::store::{EntityFilter, GraphStore, NewRelationship};

use crate::error::LinkerError;
use crate::options::{
    BatchProgress, BatchResult, DiscoverOptions, DiscoverProgress, DiscoverResult, LinkOptions,
    LinkResult, RelatedOptions, SemanticLinksOptions, Suggestion, SuggestionOptions, UpdateResult,
    similarity_band,
};
use crate::similarity::{SimilarityMatch, SimilarityOptions, SimilaritySearch};

/// Discovers, maintains and prunes similarity edges.
pub struct SemanticLinker<S, Q> {
    store: Arc<S>,
    similarity: Q,
}

impl<S: GraphStore, Q: SimilaritySearch> SemanticLinker<S, Q> {
    pub const fn new(store: Arc<S>, similarity: Q) -> Self {
        Self { store, similarity }
    }

    /// Scan every entity of the configured types and link each to its most
    /// similar peers.
    ///
    /// A `(source, target)` pair is attempted at most once per pass, even
    /// if the similarity backend returns the target twice.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::Store` if a page of entities cannot be listed.
    /// Per-entity failures are collected in [`DiscoverResult::issues`].
    pub async fn discover_relationships(
        &self,
        opts: &DiscoverOptions,
        mut progress: impl FnMut(&DiscoverProgress),
    ) -> Result<DiscoverResult, LinkerError> {
        let mut result = DiscoverResult::default();
        let mut attempted: HashSet<(String, String)> = HashSet::new();
        let search = SimilarityOptions {
            limit: opts.max_per_entity + 1,
            min_similarity: opts.min_similarity,
            entity_types: opts.entity_types.clone(),
        };
        let page_size = opts.batch_size.max(1);

        for &entity_type in &opts.entity_types {
            let mut offset = 0;
            loop {
                let page = self
                    .store
                    .list_entities(&EntityFilter {
                        entity_types: vec![entity_type],
                        file_path: None,
                        limit: page_size,
                        offset,
                    })
                    .await?;
                let page_len = page.len();

                for entity in &page {
                    self.discover_for_entity(entity, opts, &search, &mut attempted, &mut result)
                        .await;
                    progress(&DiscoverProgress {
                        entity_type,
                        entity_id: entity.id.clone(),
                        processed: result.entities_processed,
                        skipped: result.entities_skipped,
                        created: result.created,
                    });
                }

                if page_len < page_size as usize {
                    break;
                }
                offset += page_size;
            }
        }

        tracing::info!(
            created = result.created,
            processed = result.entities_processed,
            skipped = result.entities_skipped,
            issues = result.issues.len(),
            "discovery pass complete"
        );
        Ok(result)
    }

    async fn discover_for_entity(
        &self,
        entity: &Entity,
        opts: &DiscoverOptions,
        search: &SimilarityOptions,
        attempted: &mut HashSet<(String, String)>,
        result: &mut DiscoverResult,
    ) {
        if opts.skip_existing {
            match self
                .store
                .relationships_for(&entity.id, Direction::Out, Some(opts.relationship))
                .await
            {
                Ok(edges) if !edges.is_empty() => {
                    result.entities_skipped += 1;
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(entity = %entity.id, error = %e, "existing link check failed");
                    result.issues.push(Issue::recoverable(&entity.id, e));
                    return;
                }
            }
        }

        result.entities_processed += 1;
        let matches = match self.similarity.find_similar(entity.seed_text(), search).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(entity = %entity.id, error = %e, "similarity search failed");
                result.issues.push(Issue::recoverable(&entity.id, e));
                return;
            }
        };

        // Repeated targets must not use up the per-entity cap.
        let candidates = matches
            .into_iter()
            .filter(|m| {
                m.entity_id != entity.id
                    && attempted.insert((entity.id.clone(), m.entity_id.clone()))
            })
            .take(opts.max_per_entity);
        for candidate in candidates {
            match self
                .create_if_absent(&entity.id, &candidate.entity_id, opts.relationship, candidate.similarity)
                .await
            {
                Ok(Some(_)) => result.created += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(source = %entity.id, target = %candidate.entity_id, error = %e, "link creation failed");
                    result.issues.push(Issue::recoverable(&entity.id, e));
                }
            }
        }
    }

    /// Link one entity to its most similar peers.
    ///
    /// Stops once `max_links` outgoing edges have been created; matches
    /// that already had an edge do not count toward the cap.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::EntityNotFound` if `entity_id` does not exist,
    /// or `LinkerError::Store` if the lookup fails.
    pub async fn link_new_entity(
        &self,
        entity_id: &str,
        opts: &LinkOptions,
    ) -> Result<LinkResult, LinkerError> {
        let entity = self.require_entity(entity_id).await?;
        let mut result = LinkResult::default();

        let search = SimilarityOptions {
            limit: opts.max_links + 1,
            min_similarity: opts.min_similarity,
            entity_types: opts.entity_types.clone().unwrap_or_default(),
        };
        let matches = match self.similarity.find_similar(entity.seed_text(), &search).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(entity = %entity.id, error = %e, "similarity search failed");
                result.issues.push(Issue::recoverable(&entity.id, e));
                return Ok(result);
            }
        };

        let mut seen = HashSet::new();
        for candidate in matches {
            if result.outgoing.len() >= opts.max_links {
                break;
            }
            if candidate.entity_id == entity.id || !seen.insert(candidate.entity_id.clone()) {
                continue;
            }

            match self
                .create_if_absent(&entity.id, &candidate.entity_id, opts.relationship, candidate.similarity)
                .await
            {
                Ok(Some(edge)) => {
                    result.created += 1;
                    result.outgoing.push(edge);
                }
                Ok(None) => {}
                Err(e) => result.issues.push(Issue::recoverable(&entity.id, e)),
            }

            if opts.bidirectional {
                match self
                    .create_if_absent(&candidate.entity_id, &entity.id, opts.relationship, candidate.similarity)
                    .await
                {
                    Ok(Some(edge)) => {
                        result.created += 1;
                        result.incoming.push(edge);
                    }
                    Ok(None) => {}
                    Err(e) => result.issues.push(Issue::recoverable(&candidate.entity_id, e)),
                }
            }
        }

        tracing::debug!(entity = %entity.id, created = result.created, "linked entity");
        Ok(result)
    }

    /// Entities most similar to free text.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::Similarity` if the search fails.
    pub async fn find_related(
        &self,
        query: &str,
        opts: &RelatedOptions,
    ) -> Result<Vec<SimilarityMatch>, LinkerError> {
        let search = SimilarityOptions {
            limit: opts.limit,
            min_similarity: opts.min_similarity,
            entity_types: opts.entity_types.clone().unwrap_or_default(),
        };
        Ok(self.similarity.find_similar(query, &search).await?)
    }

    /// Concepts, technologies and patterns similar to an entity.
    ///
    /// `opts.entity_types` can only narrow the candidates within those three
    /// types.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::EntityNotFound` for an unknown id and
    /// `LinkerError::Similarity` if the search fails.
    pub async fn find_related_concepts(
        &self,
        entity_id: &str,
        opts: &RelatedOptions,
    ) -> Result<Vec<SimilarityMatch>, LinkerError> {
        let entity = self.require_entity(entity_id).await?;
        let entity_types = conceptual_types(opts.entity_types.as_deref());
        if entity_types.is_empty() {
            return Ok(Vec::new());
        }
        let search = SimilarityOptions {
            limit: opts.limit + 1,
            min_similarity: opts.min_similarity,
            entity_types,
        };
        let mut matches = self.similarity.find_similar(entity.seed_text(), &search).await?;
        matches.retain(|m| m.entity_id != entity.id);
        matches.truncate(opts.limit);
        Ok(matches)
    }

    /// Similarity edges touching an entity.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::EntityNotFound` for an unknown id and
    /// `LinkerError::Store` if the lookup fails.
    pub async fn get_semantic_links(
        &self,
        entity_id: &str,
        opts: &SemanticLinksOptions,
    ) -> Result<Vec<Relationship>, LinkerError> {
        self.require_entity(entity_id).await?;
        let mut edges = self
            .store
            .relationships_for(entity_id, opts.direction, Some(opts.relationship))
            .await?;
        if let Some(min_weight) = opts.min_weight {
            edges.retain(|e| e.weight >= min_weight);
        }
        Ok(edges)
    }

    /// Replace an entity's semantic edges with a fresh set.
    ///
    /// Only outgoing edges tagged as semantically discovered are removed;
    /// hand-authored edges of the same type survive.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::EntityNotFound` for an unknown id and
    /// `LinkerError::Store` if the existing edges cannot be listed.
    pub async fn update_links(
        &self,
        entity_id: &str,
        opts: &LinkOptions,
    ) -> Result<UpdateResult, LinkerError> {
        self.require_entity(entity_id).await?;
        let mut result = UpdateResult::default();

        let existing = self
            .store
            .relationships_for(entity_id, Direction::Out, Some(opts.relationship))
            .await?;
        for edge in existing.iter().filter(|e| e.is_semantic()) {
            match self.store.delete_relationship(&edge.id).await {
                Ok(true) => result.removed += 1,
                Ok(false) => {}
                Err(e) => result.issues.push(Issue::recoverable(&edge.id, e)),
            }
        }

        let linked = self.link_new_entity(entity_id, opts).await?;
        result.created = linked.created;
        result.issues.extend(linked.issues);
        Ok(result)
    }

    /// Similar entities not yet linked from `entity_id`, with reasons.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::EntityNotFound` for an unknown id,
    /// `LinkerError::Similarity` if the search fails and
    /// `LinkerError::Store` if an existence check fails.
    pub async fn get_suggestions(
        &self,
        entity_id: &str,
        opts: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>, LinkerError> {
        let entity = self.require_entity(entity_id).await?;
        let search = SimilarityOptions {
            limit: opts.limit + 1,
            min_similarity: opts.min_similarity,
            entity_types: opts.entity_types.clone().unwrap_or_default(),
        };
        let matches = self.similarity.find_similar(entity.seed_text(), &search).await?;

        let mut suggestions = Vec::new();
        for candidate in matches {
            if suggestions.len() >= opts.limit {
                break;
            }
            if candidate.entity_id == entity.id
                || suggestions
                    .iter()
                    .any(|s: &Suggestion| s.target_id == candidate.entity_id)
            {
                continue;
            }
            if self
                .store
                .relationship_exists(&entity.id, &candidate.entity_id, opts.relationship)
                .await?
            {
                continue;
            }
            suggestions.push(Suggestion {
                reason: suggestion_reason(entity.entity_type, &candidate),
                target_id: candidate.entity_id,
                target_name: candidate.name,
                target_type: candidate.entity_type,
                similarity: candidate.similarity,
            });
        }
        Ok(suggestions)
    }

    /// Link several entities in turn.
    ///
    /// An entity that fails outright is counted in `failed` with a fatal
    /// issue; the batch carries on.
    pub async fn batch_link(
        &self,
        entity_ids: &[String],
        opts: &LinkOptions,
        mut progress: impl FnMut(&BatchProgress),
    ) -> BatchResult {
        let mut result = BatchResult::default();
        let total = entity_ids.len();

        for (i, id) in entity_ids.iter().enumerate() {
            result.processed += 1;
            match self.link_new_entity(id, opts).await {
                Ok(linked) => {
                    result.created += linked.created;
                    result.issues.extend(linked.issues);
                }
                Err(e) => {
                    tracing::warn!(entity = %id, error = %e, "batch link failed for entity");
                    result.failed += 1;
                    result.issues.push(Issue::fatal(id, e));
                }
            }
            progress(&BatchProgress {
                completed: i + 1,
                total,
                entity_id: id.clone(),
            });
        }
        result
    }

    /// Delete semantic edges of `relationship` weighing less than `min_weight`.
    /// Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns `LinkerError::Store` if the edges cannot be listed.
    pub async fn prune_weak_links(
        &self,
        min_weight: f64,
        relationship: EdgeType,
    ) -> Result<u32, LinkerError> {
        let edges = self.store.relationships_by_type(relationship).await?;
        let mut pruned = 0;
        for edge in edges.iter().filter(|e| e.weight < min_weight && e.is_semantic()) {
            match self.store.delete_relationship(&edge.id).await {
                Ok(true) => pruned += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(edge = %edge.id, error = %e, "failed to prune edge"),
            }
        }
        tracing::info!(pruned, min_weight, %relationship, "pruned weak semantic links");
        Ok(pruned)
    }

    async fn require_entity(&self, entity_id: &str) -> Result<Entity, LinkerError> {
        self.store
            .get_entity(entity_id)
            .await?
            .ok_or_else(|| LinkerError::EntityNotFound(entity_id.to_string()))
    }

    /// Create `source -> target` unless such an edge already exists.
    async fn create_if_absent(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: EdgeType,
        similarity: f64,
    ) -> Result<Option<Relationship>, StoreError> {
        if self
            .store
            .relationship_exists(source_id, target_id, relationship)
            .await?
        {
            return Ok(None);
        }
        self.store
            .create_relationship(&NewRelationship {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
                relationship,
                weight: similarity,
                metadata: semantic_metadata(similarity),
            })
            .await
    }
}

fn suggestion_reason(source_type: EntityType, candidate: &SimilarityMatch) -> String {
    let band = similarity_band(candidate.similarity);
    let percent = (candidate.similarity * 100.0).round();
    if candidate.entity_type == source_type {
        format!("{band} {source_type} ({percent}% match)")
    } else {
        format!(
            "{band} {} for this {source_type} ({percent}% match)",
            candidate.entity_type
        )
    }
}

/// The conceptual types, narrowed to `requested` when given.
fn conceptual_types(requested: Option<&[EntityType]>) -> Vec<EntityType> {
    EntityType::CONCEPTUAL
        .iter()
        .copied()
        .filter(|t| requested.is_none_or(|r| r.contains(t)))
        .collect()
}
