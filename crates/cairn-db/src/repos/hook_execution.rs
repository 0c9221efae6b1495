//! Hook execution audit trail. Rows are append-only.

use cairn_core::entities::HookExecution;
use cairn_core::enums::HookType;

use crate::GraphDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, parse_datetime, parse_enum, parse_string_list};

const HOOK_COLUMNS: &str = "id, project_id, hook_type, timestamp, repository, branch, commit_hash, \
     duration_ms, success, files_indexed, entities_updated, message, warnings_json, errors_json";

fn row_to_execution(row: &libsql::Row) -> Result<HookExecution, DatabaseError> {
    Ok(HookExecution {
        id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        hook_type: parse_enum(&row.get::<String>(2)?)?,
        timestamp: parse_datetime(&row.get::<String>(3)?)?,
        repository: row.get::<String>(4)?,
        branch: get_opt_string(row, 5)?,
        commit_hash: get_opt_string(row, 6)?,
        duration_ms: u64::try_from(row.get::<i64>(7)?)
            .map_err(|e| DatabaseError::Query(format!("duration_ms: {e}")))?,
        success: row.get::<i64>(8)? != 0,
        files_indexed: get_u32(row, 9)?,
        entities_updated: get_u32(row, 10)?,
        message: row.get::<String>(11)?,
        warnings: parse_string_list(&row.get::<String>(12)?)?,
        errors: parse_string_list(&row.get::<String>(13)?)?,
    })
}

impl GraphDb {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn record_hook_execution(&self, exec: &HookExecution) -> Result<(), DatabaseError> {
        let duration = i64::try_from(exec.duration_ms).unwrap_or(i64::MAX);
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO hook_executions ({HOOK_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                libsql::params![
                    exec.id.as_str(),
                    exec.project_id.as_str(),
                    exec.hook_type.as_str(),
                    exec.timestamp.to_rfc3339(),
                    exec.repository.as_str(),
                    exec.branch.as_deref(),
                    exec.commit_hash.as_deref(),
                    duration,
                    i64::from(exec.success),
                    i64::from(exec.files_indexed),
                    i64::from(exec.entities_updated),
                    exec.message.as_str(),
                    serde_json::to_string(&exec.warnings)?,
                    serde_json::to_string(&exec.errors)?
                ],
            )
            .await?;
        tracing::debug!(id = %exec.id, hook = %exec.hook_type, success = exec.success, "recorded hook execution");
        Ok(())
    }

    /// Most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_hook_executions(
        &self,
        project_id: &str,
        hook_type: Option<HookType>,
        limit: u32,
    ) -> Result<Vec<HookExecution>, DatabaseError> {
        let mut params = vec![libsql::Value::Text(project_id.to_string())];
        let type_clause = hook_type.map_or(String::new(), |h| {
            params.push(libsql::Value::Text(h.as_str().to_string()));
            " AND hook_type = ?2".to_string()
        });
        let sql = format!(
            "SELECT {HOOK_COLUMNS} FROM hook_executions
             WHERE project_id = ?1{type_clause}
             ORDER BY timestamp DESC, rowid DESC LIMIT {limit}"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_execution(&row)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn execution(id: &str, hook_type: HookType, minutes_ago: i64) -> HookExecution {
        HookExecution {
            id: id.into(),
            project_id: "proj".into(),
            hook_type,
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            repository: "/work/repo".into(),
            branch: Some("main".into()),
            commit_hash: Some("abc123".into()),
            duration_ms: 42,
            success: true,
            files_indexed: 3,
            entities_updated: 0,
            message: "Indexed 3 files".into(),
            warnings: vec!["slow".into()],
            errors: vec![],
        }
    }

    #[tokio::test]
    async fn record_then_list_roundtrips() {
        let db = test_db().await;
        let exec = execution("hke-00000001", HookType::PostCommit, 0);
        db.record_hook_execution(&exec).await.unwrap();

        let listed = db.list_hook_executions("proj", None, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.id, exec.id);
        assert_eq!(stored.hook_type, HookType::PostCommit);
        assert_eq!(stored.warnings, vec!["slow"]);
        assert_eq!(stored.files_indexed, 3);
        assert!(stored.success);
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let db = test_db().await;
        db.record_hook_execution(&execution("hke-1", HookType::PostCommit, 10)).await.unwrap();
        db.record_hook_execution(&execution("hke-2", HookType::PrePush, 5)).await.unwrap();
        db.record_hook_execution(&execution("hke-3", HookType::PostCommit, 1)).await.unwrap();

        let commits = db
            .list_hook_executions("proj", Some(HookType::PostCommit), 10)
            .await
            .unwrap();
        let ids: Vec<_> = commits.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["hke-3", "hke-1"]);

        assert_eq!(db.list_hook_executions("proj", None, 2).await.unwrap().len(), 2);
        assert!(db.list_hook_executions("other", None, 10).await.unwrap().is_empty());
    }
}
