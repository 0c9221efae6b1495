//! Hook event dispatch.
//!
//! [`HookHandler::handle`] maps an event plus the hook configuration to a
//! [`HookResult`] and then writes exactly one [`HookExecution`] audit row.
//! It never returns an error: a failing branch becomes an unsuccessful
//! result, and a failing audit write is logged and dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use cairn_config::HookConfig;
use cairn_core::entities::HookExecution;
use cairn_core::enums::HookType;
use cairn_core::ids::PREFIX_HOOK_EXECUTION;
use cairn_core::store::AuditStore;
use serde::Deserialize;
use serde_json::json;

use crate::error::HookError;
use crate::event::{HookEvent, HookResult};
use crate::impact::{AnalyzeOptions, ImpactAnalyzer, diff_name_status};
use crate::tools::ToolClient;

/// Base ref for post-merge impact analysis when the event has no previous commit.
const MERGE_BASE_FALLBACK: &str = "ORIG_HEAD";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IndexOutcome {
    files_indexed: Option<u32>,
    entities_updated: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IndexStatus {
    stale: Option<bool>,
    up_to_date: Option<bool>,
    last_indexed_commit: Option<String>,
}

impl IndexStatus {
    /// `None` when the result says nothing about freshness.
    fn staleness(&self) -> Option<bool> {
        self.stale.or_else(|| self.up_to_date.map(|fresh| !fresh))
    }
}

pub struct HookHandler<A> {
    store: Arc<A>,
    project_id: String,
    config: HookConfig,
    tools: Option<Arc<dyn ToolClient>>,
    analyzer: ImpactAnalyzer,
}

impl<A: AuditStore> HookHandler<A> {
    pub fn new(store: Arc<A>, project_id: impl Into<String>, config: HookConfig) -> Self {
        Self {
            store,
            project_id: project_id.into(),
            config,
            tools: None,
            analyzer: ImpactAnalyzer::new(None),
        }
    }

    /// Use `tools` for indexing, freshness checks and impact lookups.
    #[must_use]
    pub fn with_tools(mut self, tools: Arc<dyn ToolClient>) -> Self {
        self.analyzer = ImpactAnalyzer::new(Some(Arc::clone(&tools)));
        self.tools = Some(tools);
        self
    }

    pub async fn handle(&self, event: &HookEvent) -> HookResult {
        let started = Instant::now();
        tracing::debug!(hook = %event.hook_type, commit = %event.current_commit, "handling hook");

        let outcome = match event.hook_type {
            HookType::PreCommit => self.pre_commit(event).await,
            HookType::PostMerge => Ok(self.post_merge(event).await),
            HookType::PrePush => Ok(self.pre_push(event).await),
            HookType::PostCheckout => Ok(self.post_checkout(event).await),
        };
        let mut result = outcome.unwrap_or_else(|e| {
            tracing::error!(hook = %event.hook_type, %e, "hook failed");
            HookResult::failed(&e)
        });
        result.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        for warning in &result.warnings {
            tracing::warn!(hook = %event.hook_type, "{warning}");
        }
        self.audit(event, &result).await;
        result
    }

    async fn pre_commit(&self, event: &HookEvent) -> Result<HookResult, HookError> {
        if !self.config.index_on_commit {
            return Ok(HookResult::ok("Indexing on commit disabled"));
        }
        let staged = event.staged_files.as_deref().unwrap_or_default();
        if staged.is_empty() {
            return Ok(HookResult::ok("No staged files to index"));
        }
        if staged.len() > self.config.max_files_to_index {
            let message = format!(
                "Too many files to index ({} > {}), skipping",
                staged.len(),
                self.config.max_files_to_index
            );
            return Ok(HookResult::ok(message.clone()).with_warning(message));
        }
        let Some(tools) = &self.tools else {
            return Ok(HookResult::ok("Indexing skipped")
                .with_warning("No tool client configured; staged files were not indexed"));
        };

        let (files, entities) = index_files(tools.as_ref(), event, staged).await?;
        Ok(HookResult {
            files_indexed: files,
            entities_updated: entities,
            ..HookResult::ok(format!("Indexed {files} staged files"))
        })
    }

    async fn post_merge(&self, event: &HookEvent) -> HookResult {
        let mut result = HookResult::ok("Post-merge processing complete");

        if self.config.sync_on_merge {
            self.sync_merged_files(event, &mut result).await;
        }

        if self.config.generate_impact_report {
            let base = event
                .previous_commit
                .clone()
                .unwrap_or_else(|| MERGE_BASE_FALLBACK.to_string());
            let report = self
                .analyzer
                .analyze(&AnalyzeOptions {
                    repo_path: PathBuf::from(&event.repository),
                    base_branch: base,
                    target_branch: event.current_commit.clone(),
                })
                .await;
            tracing::info!("{}", report.summary().trim_end());
            match self.store.save_impact_report(&self.project_id, &report).await {
                Ok(id) => result.impact_report_id = Some(id),
                Err(e) => result
                    .warnings
                    .push(format!("Impact report was not saved: {e}")),
            }
        }
        if !result.success {
            result.message = "Post-merge processing finished with errors".to_string();
        }
        result
    }

    /// Re-index merged files and record the merge commit as indexed.
    /// Problems land on `result` instead of aborting the rest of post-merge.
    async fn sync_merged_files(&self, event: &HookEvent, result: &mut HookResult) {
        let merged = event.merged_files.as_deref().unwrap_or_default();
        if merged.len() > self.config.max_files_to_index {
            result.warnings.push(format!(
                "Too many merged files to index ({} > {}), skipping",
                merged.len(),
                self.config.max_files_to_index
            ));
            return;
        }
        if !merged.is_empty() {
            let Some(tools) = &self.tools else {
                result
                    .warnings
                    .push("No tool client configured; merged files were not indexed".into());
                return;
            };
            match index_files(tools.as_ref(), event, merged).await {
                Ok((files, entities)) => {
                    result.files_indexed += files;
                    result.entities_updated += entities;
                }
                Err(e) => {
                    result.success = false;
                    result.errors.push(format!("Re-indexing merged files failed: {e}"));
                    return;
                }
            }
        }

        if let Err(e) = self
            .store
            .mark_commit_indexed(&self.project_id, &event.current_commit, result.files_indexed)
            .await
        {
            result
                .warnings
                .push(format!("Could not record indexed commit: {e}"));
        }
    }

    async fn pre_push(&self, event: &HookEvent) -> HookResult {
        if !self.config.validate_on_push {
            return HookResult::ok("Push validation disabled");
        }

        if let Some(tools) = &self.tools {
            let params = json!({
                "repository": event.repository,
                "branch": event.current_branch,
                "commit": event.current_commit,
            });
            match tools.call_tool("index_status", params).await {
                Ok(value) => {
                    let status = serde_json::from_value::<IndexStatus>(value)
                        .ok()
                        .and_then(|status| status.staleness().map(|stale| (stale, status)));
                    match status {
                        Some((true, status)) => {
                            let message = format!(
                                "Index is stale for {} (last indexed: {}); re-index before pushing",
                                event.current_commit,
                                status.last_indexed_commit.as_deref().unwrap_or("never")
                            );
                            return HookResult {
                                success: false,
                                errors: vec![message.clone()],
                                ..HookResult::ok(message)
                            };
                        }
                        Some((false, _)) => return HookResult::ok("Index is up to date"),
                        None => tracing::warn!(
                            "index_status result not recognised; falling back to local record"
                        ),
                    }
                }
                Err(e) => {
                    tracing::warn!(%e, "index_status failed; falling back to local record");
                }
            }
        }

        match self
            .store
            .is_commit_indexed(&self.project_id, &event.current_commit)
            .await
        {
            Ok(true) => HookResult::ok("Index is up to date"),
            Ok(false) => HookResult::ok("Index freshness unknown").with_warning(format!(
                "No index record for {}; consider re-indexing",
                event.current_commit
            )),
            Err(e) => HookResult::ok("Index freshness unknown")
                .with_warning(format!("Could not read index records: {e}")),
        }
    }

    async fn post_checkout(&self, event: &HookEvent) -> HookResult {
        let previous = match event.previous_commit.as_deref() {
            Some(previous) if previous != event.current_commit => previous,
            _ => return HookResult::ok("File checkout, skipping"),
        };

        let (changed, warning) = match diff_name_status(
            PathBuf::from(&event.repository).as_path(),
            previous,
            &event.current_commit,
        )
        .await
        {
            Ok(files) => (files.total(), None),
            Err(e) => (0, Some(format!("Could not count changed files: {e}"))),
        };
        let mut result = HookResult::ok(format!(
            "Checked out {} ({changed} files changed)",
            event.current_branch
        ));
        if let Some(warning) = warning {
            result = result.with_warning(warning);
        }
        if changed > self.config.large_checkout_threshold {
            result = result.with_warning(format!(
                "Large checkout: {changed} files changed; consider re-indexing"
            ));
        }
        result
    }

    async fn audit(&self, event: &HookEvent, result: &HookResult) {
        let id = match self.store.generate_id(PREFIX_HOOK_EXECUTION).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%e, "could not allocate hook execution id; audit skipped");
                return;
            }
        };
        let execution = HookExecution {
            id,
            project_id: self.project_id.clone(),
            hook_type: event.hook_type,
            timestamp: event.timestamp,
            repository: event.repository.clone(),
            branch: Some(event.current_branch.clone()).filter(|b| !b.is_empty()),
            commit_hash: Some(event.current_commit.clone()).filter(|c| !c.is_empty()),
            duration_ms: result.duration_ms,
            success: result.success,
            files_indexed: result.files_indexed,
            entities_updated: result.entities_updated,
            message: result.message.clone(),
            warnings: result.warnings.clone(),
            errors: result.errors.clone(),
        };
        if let Err(e) = self.store.record_hook_execution(&execution).await {
            tracing::warn!(%e, "failed to record hook execution");
        }
    }
}

async fn index_files(
    tools: &dyn ToolClient,
    event: &HookEvent,
    files: &[String],
) -> Result<(u32, u32), HookError> {
    let value = tools
        .call_tool(
            "index_files",
            json!({ "repository": event.repository, "files": files }),
        )
        .await?;
    let outcome: IndexOutcome = serde_json::from_value(value).unwrap_or_default();
    let files_indexed = outcome
        .files_indexed
        .unwrap_or_else(|| u32::try_from(files.len()).unwrap_or(u32::MAX));
    Ok((files_indexed, outcome.entities_updated))
}
