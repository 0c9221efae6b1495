//! Which commits have had their changed files sent for re-indexing.

use cairn_core::entities::IndexedCommit;
use chrono::Utc;

use crate::GraphDb;
use crate::error::DatabaseError;
use crate::helpers::{get_u32, parse_datetime};

impl GraphDb {
    /// Record a commit as indexed. Re-marking refreshes the timestamp and count.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn mark_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
        file_count: u32,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO indexed_commits (project_id, commit_hash, indexed_at, file_count)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(project_id, commit_hash) DO UPDATE SET
                     indexed_at = excluded.indexed_at,
                     file_count = excluded.file_count",
                libsql::params![
                    project_id,
                    commit_hash,
                    Utc::now().to_rfc3339(),
                    i64::from(file_count)
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn is_commit_indexed(
        &self,
        project_id: &str,
        commit_hash: &str,
    ) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT 1 FROM indexed_commits WHERE project_id = ?1 AND commit_hash = ?2",
                [project_id, commit_hash],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_indexed_commit(
        &self,
        project_id: &str,
    ) -> Result<Option<IndexedCommit>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT project_id, commit_hash, indexed_at, file_count FROM indexed_commits
                 WHERE project_id = ?1 ORDER BY indexed_at DESC, rowid DESC LIMIT 1",
                [project_id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        Ok(Some(IndexedCommit {
            project_id: row.get::<String>(0)?,
            commit_hash: row.get::<String>(1)?,
            indexed_at: parse_datetime(&row.get::<String>(2)?)?,
            file_count: get_u32(&row, 3)?,
        }))
    }
}
