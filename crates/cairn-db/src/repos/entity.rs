//! Entity repository: upsert by qualified name, lookup, filtered listing.

use cairn_core::entities::Entity;
use cairn_core::enums::EntityType;
use cairn_core::ids::PREFIX_ENTITY;
use cairn_core::store::{EntityFilter, NewEntity};
use chrono::Utc;

use crate::GraphDb;
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, get_opt_u32, parse_datetime, parse_enum, parse_json_map, placeholders,
};

pub(crate) const ENTITY_COLUMNS: &str = "id, entity_type, name, qualified_name, content, summary, \
     file_path, start_line, end_line, metadata, created_at, updated_at";

pub(crate) fn row_to_entity(row: &libsql::Row) -> Result<Entity, DatabaseError> {
    Ok(Entity {
        id: row.get::<String>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        name: row.get::<String>(2)?,
        qualified_name: row.get::<String>(3)?,
        content: get_opt_string(row, 4)?,
        summary: get_opt_string(row, 5)?,
        file_path: get_opt_string(row, 6)?,
        start_line: get_opt_u32(row, 7)?,
        end_line: get_opt_u32(row, 8)?,
        metadata: parse_json_map(&row.get::<String>(9)?)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl GraphDb {
    /// Insert an entity, or update the existing row with the same
    /// `qualified_name` in place. The id of an existing row never changes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn upsert_entity(&self, entity: &NewEntity) -> Result<Entity, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let id = self.generate_id(PREFIX_ENTITY).await?;
        let metadata = serde_json::to_string(&entity.metadata)?;

        let mut rows = self
            .conn()
            .query(
                &format!(
                    "INSERT INTO entities (id, entity_type, name, qualified_name, content, summary,
                         file_path, start_line, end_line, metadata, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
                     ON CONFLICT(qualified_name) DO UPDATE SET
                         entity_type = excluded.entity_type,
                         name = excluded.name,
                         content = excluded.content,
                         summary = excluded.summary,
                         file_path = excluded.file_path,
                         start_line = excluded.start_line,
                         end_line = excluded.end_line,
                         metadata = excluded.metadata,
                         updated_at = excluded.updated_at
                     RETURNING {ENTITY_COLUMNS}"
                ),
                libsql::params![
                    id.as_str(),
                    entity.entity_type.as_str(),
                    entity.name.as_str(),
                    entity.qualified_name.as_str(),
                    entity.content.as_deref(),
                    entity.summary.as_deref(),
                    entity.file_path.as_deref(),
                    entity.start_line.map(i64::from),
                    entity.end_line.map(i64::from),
                    metadata,
                    now
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_entity(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_entity(&self, id: &str) -> Result<Option<Entity>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1"),
                [id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_entity(&row)).transpose()
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_entity_by_qualified_name(
        &self,
        qualified_name: &str,
    ) -> Result<Option<Entity>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE qualified_name = ?1"),
                [qualified_name],
            )
            .await?;
        rows.next().await?.map(|row| row_to_entity(&row)).transpose()
    }

    /// Entities with exactly this `name` among the given types. Used to
    /// resolve bare type names from annotations to their definitions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_entities_by_name(
        &self,
        name: &str,
        types: &[EntityType],
    ) -> Result<Vec<Entity>, DatabaseError> {
        let filter = EntityFilter {
            entity_types: types.to_vec(),
            ..EntityFilter::default()
        };
        self.query_entities(&filter, Some(name)).await
    }

    /// List entities matching a filter, ordered by qualified name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_entities(&self, filter: &EntityFilter) -> Result<Vec<Entity>, DatabaseError> {
        self.query_entities(filter, None).await
    }

    /// Total entity count, for status output.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_entities(&self) -> Result<u64, DatabaseError> {
        let mut rows = self.conn().query("SELECT COUNT(*) FROM entities", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        u64::try_from(row.get::<i64>(0)?).map_err(|e| DatabaseError::Query(e.to_string()))
    }

    async fn query_entities(
        &self,
        filter: &EntityFilter,
        name: Option<&str>,
    ) -> Result<Vec<Entity>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if !filter.entity_types.is_empty() {
            conditions.push(format!(
                "entity_type IN ({})",
                placeholders(filter.entity_types.len(), params.len())
            ));
            params.extend(
                filter
                    .entity_types
                    .iter()
                    .map(|t| libsql::Value::Text(t.as_str().to_string())),
            );
        }
        if let Some(ref path) = filter.file_path {
            params.push(libsql::Value::Text(path.clone()));
            conditions.push(format!("file_path = ?{}", params.len()));
        }
        if let Some(name) = name {
            params.push(libsql::Value::Text(name.to_string()));
            conditions.push(format!("name = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {ENTITY_COLUMNS} FROM entities {where_clause}
             ORDER BY qualified_name LIMIT {} OFFSET {}",
            filter.limit, filter.offset
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
