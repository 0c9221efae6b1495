//! # cairn-db
//!
//! libSQL storage for the Cairn knowledge graph.
//!
//! Holds entities, relationships, entity embeddings, and the git hook audit
//! trail (hook executions, impact reports, indexed commits). `GraphDb`
//! implements the `GraphStore` and `AuditStore` traits from `cairn-core`, so
//! the linker and hook handler never see SQL.
//!
//! Relationships carry a UNIQUE constraint on `(source_id, target_id,
//! relationship)`. A duplicate insert is reported as "not created" rather
//! than as an error, which closes the check-then-create race between
//! concurrent linkers.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
mod store;

#[cfg(test)]
mod test_support;

pub use error::DatabaseError;
pub use repos::embedding::cosine_similarity;
pub use repos::ingest::IngestStats;

use libsql::Builder;

/// Central database handle for graph and audit state.
///
/// Wraps a libSQL database and a single connection. All repository methods
/// are implemented as `impl GraphDb` blocks in [`repos`].
pub struct GraphDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl GraphDb {
    /// Open a local database at the given path, or `":memory:"` for tests.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let graph_db = Self { db, conn };
        graph_db.run_migrations().await?;
        tracing::debug!(path, "opened graph database");
        Ok(graph_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"ent-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
