//! Impact report persistence. The full report is kept as JSON alongside
//! a few denormalized columns for listing.

use cairn_core::entities::{ImpactReport, ImpactReportRecord};
use cairn_core::ids::PREFIX_IMPACT_REPORT;

use crate::GraphDb;
use crate::error::DatabaseError;

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl GraphDb {
    /// Persist a report and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if serialization or the insert fails.
    pub async fn save_impact_report(
        &self,
        project_id: &str,
        report: &ImpactReport,
    ) -> Result<String, DatabaseError> {
        let id = self.generate_id(PREFIX_IMPACT_REPORT).await?;
        self.conn()
            .execute(
                "INSERT INTO impact_reports (id, project_id, generated_at, base_branch, target_branch,
                     commit_range, files_added, files_modified, files_deleted, affected_entities,
                     affected_decisions, risk_level, reasons_json, report_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    report.generated_at.to_rfc3339(),
                    report.base_branch.as_str(),
                    report.target_branch.as_str(),
                    report.commit_range(),
                    count(report.changed_files.added.len()),
                    count(report.changed_files.modified.len()),
                    count(report.changed_files.deleted.len()),
                    count(report.affected_entities.len()),
                    count(report.affected_decisions.len()),
                    report.risk_level.as_str(),
                    serde_json::to_string(&report.reasons)?,
                    serde_json::to_string(report)?
                ],
            )
            .await?;
        tracing::debug!(%id, risk = %report.risk_level, "saved impact report");
        Ok(id)
    }

    /// Most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored report does not parse.
    pub async fn list_impact_reports(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<ImpactReportRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT id, project_id, report_json FROM impact_reports
                     WHERE project_id = ?1
                     ORDER BY generated_at DESC, rowid DESC LIMIT {limit}"
                ),
                [project_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(ImpactReportRecord {
                id: row.get::<String>(0)?,
                project_id: row.get::<String>(1)?,
                report: serde_json::from_str(&row.get::<String>(2)?)?,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use cairn_core::entities::ChangedFiles;
    use cairn_core::enums::RiskLevel;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn report(target: &str) -> ImpactReport {
        ImpactReport {
            generated_at: Utc::now(),
            base_branch: "main".into(),
            target_branch: target.into(),
            changed_files: ChangedFiles {
                added: vec!["src/new.ts".into()],
                modified: vec![],
                deleted: vec!["src/old.ts".into()],
            },
            affected_entities: vec![],
            affected_decisions: vec![],
            related_contexts: vec![],
            risk_level: RiskLevel::Low,
            risk_score: 2,
            reasons: vec!["1 files deleted".into()],
            suggestions: vec![],
        }
    }

    #[tokio::test]
    async fn save_then_list() {
        let db = test_db().await;
        let saved = report("feature");
        let id = db.save_impact_report("proj", &saved).await.unwrap();
        assert!(id.starts_with("imp-"));

        let listed = db.list_impact_reports("proj", 5).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].report, saved);
        assert!(db.list_impact_reports("elsewhere", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn denormalized_columns_are_filled() {
        let db = test_db().await;
        db.save_impact_report("proj", &report("feature")).await.unwrap();
        let mut rows = db
            .conn()
            .query(
                "SELECT commit_range, files_added, files_deleted, risk_level FROM impact_reports",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "main..feature");
        assert_eq!(row.get::<i64>(1).unwrap(), 1);
        assert_eq!(row.get::<i64>(2).unwrap(), 1);
        assert_eq!(row.get::<String>(3).unwrap(), "low");
    }
}
