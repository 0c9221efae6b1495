//! Writing one parsed file and its extracted edges into the graph.
//!
//! Extracted edges name their endpoints by qualified name (symbols), file
//! path (files), module specifier (imports) or bare type name (type
//! usage). Ingest turns those names into entity ids and creates the edges
//! whose endpoints can be resolved. Edges that cannot be resolved are
//! counted and skipped.

use std::collections::HashMap;

use cairn_core::enums::{EntityType, RelationshipType};
use cairn_core::store::{NewEntity, NewRelationship};
use cairn_extract::{ExtractedRelationship, ParseResult, ParsedSymbol};
use serde::Serialize;
use serde_json::Value;

use crate::GraphDb;
use crate::error::DatabaseError;

/// Entity kinds a bare type name from an annotation may refer to.
const TYPE_TARGETS: &[EntityType] = &[
    EntityType::Class,
    EntityType::Interface,
    EntityType::TypeAlias,
    EntityType::Enum,
];

/// Counts from one [`GraphDb::ingest`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub entities_upserted: u32,
    pub relationships_created: u32,
    pub relationships_existing: u32,
    pub relationships_unresolved: u32,
}

impl GraphDb {
    /// Upsert the file, its symbols and any import placeholders, then
    /// create every extracted edge whose endpoints resolve.
    ///
    /// Re-ingesting the same file is idempotent: entities are updated in
    /// place and existing edges are counted, not duplicated.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a write or lookup fails.
    pub async fn ingest(
        &self,
        parsed: &ParseResult,
        edges: &[ExtractedRelationship],
    ) -> Result<IngestStats, DatabaseError> {
        let mut stats = IngestStats::default();
        let mut ids: HashMap<String, String> = HashMap::new();

        let mut file = NewEntity::new(EntityType::File, file_name(&parsed.file_path), &parsed.file_path);
        file.file_path = Some(parsed.file_path.clone());
        if !parsed.language.is_empty() {
            file.metadata
                .insert("language".into(), Value::String(parsed.language.clone()));
        }
        let file = self.upsert_entity(&file).await?;
        ids.insert(file.qualified_name, file.id);
        stats.entities_upserted += 1;

        let mut pending: Vec<(&ParsedSymbol, Option<String>)> =
            parsed.symbols.iter().rev().map(|s| (s, None)).collect();
        while let Some((symbol, parent)) = pending.pop() {
            let Some(qualified) = symbol.resolve_qualified_name(&parsed.file_path, parent.as_deref())
            else {
                continue;
            };
            let entity = self
                .upsert_entity(&symbol_entity(symbol, &qualified, &parsed.file_path))
                .await?;
            ids.insert(qualified.clone(), entity.id);
            stats.entities_upserted += 1;
            pending.extend(symbol.children.iter().rev().map(|c| (c, Some(qualified.clone()))));
        }

        for import in parsed.imports.iter().filter(|i| !i.source.is_empty()) {
            if ids.contains_key(&import.source) {
                continue;
            }
            let module = match self.find_entity_by_qualified_name(&import.source).await? {
                Some(existing) => existing,
                None => {
                    let mut placeholder =
                        NewEntity::new(EntityType::Module, &import.source, &import.source);
                    placeholder.metadata.insert("external".into(), Value::Bool(true));
                    stats.entities_upserted += 1;
                    self.upsert_entity(&placeholder).await?
                }
            };
            ids.insert(import.source.clone(), module.id);
        }

        for edge in edges {
            let source = self.resolve_endpoint(&ids, &edge.source, None).await?;
            let target_hint = match edge.relationship {
                RelationshipType::UsesType => Some(TYPE_TARGETS),
                RelationshipType::References => Some(&[][..]),
                _ => None,
            };
            let target = self.resolve_endpoint(&ids, &edge.target, target_hint).await?;

            let (Some(source_id), Some(target_id)) = (source, target) else {
                tracing::debug!(source = %edge.source, target = %edge.target, "unresolved edge endpoint");
                stats.relationships_unresolved += 1;
                continue;
            };
            let created = self
                .create_relationship(&NewRelationship {
                    source_id,
                    target_id,
                    relationship: edge.relationship.into(),
                    weight: edge.weight,
                    metadata: edge.metadata.clone(),
                })
                .await?;
            if created.is_some() {
                stats.relationships_created += 1;
            } else {
                stats.relationships_existing += 1;
            }
        }

        tracing::info!(
            file = %parsed.file_path,
            entities = stats.entities_upserted,
            created = stats.relationships_created,
            unresolved = stats.relationships_unresolved,
            "ingested file"
        );
        Ok(stats)
    }

    /// Resolve an edge endpoint to an entity id.
    ///
    /// Exact qualified names always win. With `by_name` set, a bare name
    /// (or the part after `module:`) falls back to a unique entity of that
    /// name among the given types; an empty slice means any type.
    async fn resolve_endpoint(
        &self,
        known: &HashMap<String, String>,
        name: &str,
        by_name: Option<&[EntityType]>,
    ) -> Result<Option<String>, DatabaseError> {
        if let Some(id) = known.get(name) {
            return Ok(Some(id.clone()));
        }
        if let Some(entity) = self.find_entity_by_qualified_name(name).await? {
            return Ok(Some(entity.id));
        }
        let Some(types) = by_name else {
            return Ok(None);
        };
        let bare = name.rsplit_once(':').map_or(name, |(_, n)| n);
        let mut candidates = self.find_entities_by_name(bare, types).await?;
        if candidates.len() == 1 {
            return Ok(candidates.pop().map(|e| e.id));
        }
        Ok(None)
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn symbol_entity(symbol: &ParsedSymbol, qualified: &str, file_path: &str) -> NewEntity {
    let mut entity = NewEntity::new(symbol.kind.entity_type(), &symbol.name, qualified);
    entity.content = symbol.signature.clone();
    entity.summary = symbol.doc_comment.clone();
    entity.file_path = Some(file_path.to_string());
    entity.start_line = symbol.start_line;
    entity.end_line = symbol.end_line;
    entity
}
