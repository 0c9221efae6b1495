//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::GraphDb;
use crate::error::DatabaseError;

const MIGRATION_001: &str = include_str!("../migrations/001_graph.sql");
const MIGRATION_002: &str = include_str!("../migrations/002_hooks.sql");

impl GraphDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_graph: {e}")))?;
        self.conn
            .execute_batch(MIGRATION_002)
            .await
            .map_err(|e| DatabaseError::Migration(format!("002_hooks: {e}")))?;
        Ok(())
    }
}
