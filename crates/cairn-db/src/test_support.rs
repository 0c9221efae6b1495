//! Shared test utilities for cairn-db tests.

use cairn_core::entities::Entity;
use cairn_core::enums::EntityType;
use cairn_core::store::NewEntity;

use crate::GraphDb;

/// In-memory database with migrations applied.
pub async fn test_db() -> GraphDb {
    GraphDb::open_local(":memory:").await.unwrap()
}

/// Upsert a minimal entity named `name` under `src/{name}.ts`.
pub async fn seed_entity(db: &GraphDb, entity_type: EntityType, name: &str) -> Entity {
    let mut new = NewEntity::new(entity_type, name, format!("src/{name}.ts:{name}"));
    new.file_path = Some(format!("src/{name}.ts"));
    db.upsert_entity(&new).await.unwrap()
}
