//! Change impact analysis between two refs.
//!
//! The diff is read with `git diff --name-status`. Entity, decision and
//! context lookups go through the optional [`ToolClient`] and run
//! concurrently. Every lookup is best-effort: a failure is logged and
//! contributes nothing, so [`ImpactAnalyzer::analyze`] always produces a
//! report. Scoring ([`assess_risk`]) and [`generate_suggestions`] are pure.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cairn_core::entities::{
    AffectedDecision, AffectedEntity, ChangedFiles, ImpactReport, RelatedContext,
};
use cairn_core::enums::{ChangeType, RiskLevel};
use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::HookError;
use crate::git::{VERBATIM_PATHS, unquote_path};
use crate::tools::ToolClient;

const MAX_ENTITY_FILES: usize = 20;
const MAX_DECISION_NAMES: usize = 10;
const MAX_CONTEXT_NAMES: usize = 5;

const CODE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "rs", "go", "java", "kt", "rb", "php", "cs",
    "swift", "c", "cc", "cpp", "h", "hpp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub repo_path: PathBuf,
    pub base_branch: String,
    pub target_branch: String,
}

/// Score, level and the reasons that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u32,
    pub reasons: Vec<String>,
}

pub struct ImpactAnalyzer {
    tools: Option<Arc<dyn ToolClient>>,
}

impl ImpactAnalyzer {
    #[must_use]
    pub fn new(tools: Option<Arc<dyn ToolClient>>) -> Self {
        Self { tools }
    }

    /// Diff `base..target` and enrich it into a report.
    ///
    /// Without a tool client the entity, decision and context lists are
    /// empty but the file changes and risk are still computed.
    pub async fn analyze(&self, opts: &AnalyzeOptions) -> ImpactReport {
        let changed =
            get_changed_files(&opts.repo_path, &opts.base_branch, &opts.target_branch).await;

        let (entities, decisions, contexts) = match &self.tools {
            Some(tools) => {
                let tools = tools.as_ref();
                tokio::join!(
                    affected_entities(tools, &changed),
                    affected_decisions(tools, &changed),
                    related_contexts(tools, &changed),
                )
            }
            None => {
                tracing::debug!("no tool client configured; impact report limited to file changes");
                (Vec::new(), Vec::new(), Vec::new())
            }
        };

        let risk = assess_risk(&changed, &entities, &decisions);
        let suggestions = generate_suggestions(&changed, &entities, &decisions);
        tracing::info!(
            base = %opts.base_branch,
            target = %opts.target_branch,
            files = changed.total(),
            entities = entities.len(),
            decisions = decisions.len(),
            risk = %risk.level,
            "impact analysis complete"
        );

        ImpactReport {
            generated_at: Utc::now(),
            base_branch: opts.base_branch.clone(),
            target_branch: opts.target_branch.clone(),
            changed_files: changed,
            affected_entities: entities,
            affected_decisions: decisions,
            related_contexts: contexts,
            risk_level: risk.level,
            risk_score: risk.score,
            reasons: risk.reasons,
            suggestions,
        }
    }
}

/// Files changed between two refs. Any git failure yields empty lists.
pub async fn get_changed_files(repo_path: &Path, base: &str, target: &str) -> ChangedFiles {
    diff_name_status(repo_path, base, target)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(base, target, %e, "git diff failed");
            ChangedFiles::default()
        })
}

/// Run `git diff --name-status base target` and parse the result.
///
/// # Errors
///
/// Returns [`HookError::Git`] if git cannot be run, exits non-zero, or
/// prints output that is not UTF-8.
pub async fn diff_name_status(
    repo_path: &Path,
    base: &str,
    target: &str,
) -> Result<ChangedFiles, HookError> {
    let output = tokio::process::Command::new("git")
        .args(VERBATIM_PATHS)
        .args(["diff", "--name-status", base, target])
        .current_dir(repo_path)
        .output()
        .await
        .map_err(|e| HookError::Git(format!("run git diff: {e}")))?;
    if !output.status.success() {
        return Err(HookError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    let stdout = String::from_utf8(output.stdout)
        .map_err(|e| HookError::Git(format!("git diff output is not UTF-8: {e}")))?;
    Ok(parse_name_status(&stdout))
}

/// Parse `git diff --name-status` output.
///
/// A rename is a deletion of the old path plus an addition of the new one;
/// a copy only adds the new path.
#[must_use]
pub fn parse_name_status(output: &str) -> ChangedFiles {
    let mut changed = ChangedFiles::default();
    for line in output.lines() {
        let mut parts = line.split('\t');
        let (Some(status), Some(path)) = (parts.next(), parts.next()) else {
            continue;
        };
        let path = unquote_path(path);
        let path = path.as_str();
        let new_path = parts.next().map(unquote_path);
        match (status.chars().next(), new_path) {
            (Some('A'), _) => changed.added.push(path.to_string()),
            (Some('M' | 'T'), _) => changed.modified.push(path.to_string()),
            (Some('D'), _) => changed.deleted.push(path.to_string()),
            (Some('R'), Some(new_path)) => {
                changed.deleted.push(path.to_string());
                changed.added.push(new_path);
            }
            (Some('C'), Some(new_path)) => changed.added.push(new_path),
            _ => {}
        }
    }
    changed
}

// ── Lookups ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EntityHit {
    id: String,
    name: String,
    #[serde(alias = "type")]
    entity_type: String,
    file_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReferenceHits {
    count: Option<u32>,
    references: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DecisionHit {
    id: String,
    title: String,
    summary: String,
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContextHit {
    source: String,
    content: String,
    score: Option<f64>,
}

/// Items of a tool result: the value itself when it is an array, otherwise
/// the array under `key`. Items that do not fit `T` are dropped.
fn items<T: DeserializeOwned>(value: Value, key: &str) -> Vec<T> {
    let list = match value {
        Value::Array(list) => list,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(list)) => list,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    list.into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

async fn affected_entities(tools: &dyn ToolClient, changed: &ChangedFiles) -> Vec<AffectedEntity> {
    let mut affected = Vec::new();
    for (file, change_type) in changed.iter().take(MAX_ENTITY_FILES) {
        let hits: Vec<EntityHit> =
            match tools.call_tool("entity_search", json!({ "filePath": file })).await {
                Ok(value) => items(value, "entities"),
                Err(e) => {
                    tracing::warn!(file, %e, "entity lookup failed");
                    continue;
                }
            };
        for hit in hits.into_iter().filter(|h| !h.id.is_empty()) {
            let usage_count = usage_count(tools, &hit.id).await;
            affected.push(AffectedEntity {
                file_path: hit.file_path.unwrap_or_else(|| file.to_string()),
                id: hit.id,
                name: hit.name,
                entity_type: hit.entity_type,
                change_type,
                usage_count,
            });
        }
    }
    affected
}

async fn usage_count(tools: &dyn ToolClient, entity_id: &str) -> u32 {
    match tools
        .call_tool("entity_references", json!({ "entityId": entity_id }))
        .await
    {
        Ok(Value::Array(list)) => u32::try_from(list.len()).unwrap_or(u32::MAX),
        Ok(value) => {
            let refs: ReferenceHits = serde_json::from_value(value).unwrap_or_default();
            refs.count
                .unwrap_or_else(|| u32::try_from(refs.references.len()).unwrap_or(u32::MAX))
        }
        Err(e) => {
            tracing::warn!(entity_id, %e, "reference lookup failed");
            0
        }
    }
}

async fn affected_decisions(
    tools: &dyn ToolClient,
    changed: &ChangedFiles,
) -> Vec<AffectedDecision> {
    // basename -> (paths, whether any of them was modified or deleted)
    let mut names: Vec<&str> = Vec::new();
    let mut by_name: HashMap<&str, (Vec<String>, bool)> = HashMap::new();
    for (file, change_type) in changed.iter() {
        let name = basename(file);
        let entry = by_name.entry(name).or_insert_with(|| {
            names.push(name);
            (Vec::new(), false)
        });
        entry.0.push(file.to_string());
        entry.1 |= change_type != ChangeType::Added;
    }

    let mut decisions: BTreeMap<String, AffectedDecision> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();
    for name in names.into_iter().take(MAX_DECISION_NAMES) {
        let hits: Vec<DecisionHit> = match tools
            .call_tool("decision_search", json!({ "query": name }))
            .await
        {
            Ok(value) => items(value, "decisions"),
            Err(e) => {
                tracing::warn!(name, %e, "decision lookup failed");
                continue;
            }
        };
        let (paths, touched) = &by_name[name];
        let needle = name.to_lowercase();
        for hit in hits {
            let text = format!("{} {} {}", hit.title, hit.summary, hit.content).to_lowercase();
            if hit.id.is_empty() || !text.contains(&needle) {
                continue;
            }
            let decision = decisions.entry(hit.id.clone()).or_insert_with(|| {
                order.push(hit.id.clone());
                AffectedDecision {
                    id: hit.id.clone(),
                    title: hit.title.clone(),
                    summary: hit.summary.clone(),
                    related_files: Vec::new(),
                    might_be_invalidated: false,
                }
            });
            for path in paths {
                if !decision.related_files.contains(path) {
                    decision.related_files.push(path.clone());
                }
            }
            decision.might_be_invalidated |= *touched;
        }
    }
    order
        .into_iter()
        .filter_map(|id| decisions.remove(&id))
        .collect()
}

async fn related_contexts(tools: &dyn ToolClient, changed: &ChangedFiles) -> Vec<RelatedContext> {
    let mut names: Vec<&str> = Vec::new();
    for (file, _) in changed.iter() {
        let name = basename(file);
        if !names.contains(&name) {
            names.push(name);
        }
        if names.len() == MAX_CONTEXT_NAMES {
            break;
        }
    }
    if names.is_empty() {
        return Vec::new();
    }

    let query = names.join(" ");
    match tools
        .call_tool("context_query", json!({ "query": query, "limit": MAX_CONTEXT_NAMES }))
        .await
    {
        Ok(value) => items::<ContextHit>(value, "results")
            .into_iter()
            .filter(|hit| !hit.content.is_empty())
            .map(|hit| RelatedContext {
                source: hit.source,
                content: hit.content,
                score: hit.score,
            })
            .collect(),
        Err(e) => {
            tracing::warn!(%query, %e, "context lookup failed");
            Vec::new()
        }
    }
}

// ── Scoring ────────────────────────────────────────────────────────

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Deterministic risk score.
///
/// Deletions add 2 each, more than 10 modified files add one per 5,
/// entities used more than 5 times add 3 each and possibly invalidated
/// decisions add 2 each. High at 10, medium at 5.
#[must_use]
pub fn assess_risk(
    changed: &ChangedFiles,
    entities: &[AffectedEntity],
    decisions: &[AffectedDecision],
) -> RiskAssessment {
    let mut score = 0u32;
    let mut reasons = Vec::new();

    let deleted = changed.deleted.len();
    if deleted > 0 {
        score = score.saturating_add(count(deleted).saturating_mul(2));
        reasons.push(format!("{} deleted", plural(deleted, "file", "files")));
    }

    let modified = changed.modified.len();
    if modified > 10 {
        score = score.saturating_add(count(modified / 5));
        reasons.push(format!("{modified} files modified"));
    }

    let heavy = entities.iter().filter(|e| e.usage_count > 5).count();
    if heavy > 0 {
        score = score.saturating_add(count(heavy).saturating_mul(3));
        reasons.push(format!(
            "{} with more than 5 usages affected",
            plural(heavy, "entity", "entities")
        ));
    }

    let invalidated = decisions.iter().filter(|d| d.might_be_invalidated).count();
    if invalidated > 0 {
        score = score.saturating_add(count(invalidated).saturating_mul(2));
        reasons.push(format!(
            "{} might be invalidated",
            plural(invalidated, "decision", "decisions")
        ));
    }

    RiskAssessment {
        level: RiskLevel::from_score(score),
        score,
        reasons,
    }
}

fn is_untested_code(path: &str) -> bool {
    let lower = path.to_lowercase();
    let is_code = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CODE_EXTENSIONS.contains(&ext));
    is_code && !lower.contains("test") && !lower.contains("spec")
}

#[must_use]
pub fn generate_suggestions(
    changed: &ChangedFiles,
    entities: &[AffectedEntity],
    decisions: &[AffectedDecision],
) -> Vec<String> {
    let mut suggestions = Vec::new();

    let widely_used: Vec<&str> = entities
        .iter()
        .filter(|e| e.usage_count > 10)
        .map(|e| e.name.as_str())
        .collect();
    if !widely_used.is_empty() {
        let named = widely_used.iter().take(3).copied().collect::<Vec<_>>().join(", ");
        suggestions.push(format!("Review widely-used entities carefully: {named}"));
    }

    if entities.iter().any(|e| e.change_type == ChangeType::Deleted) {
        suggestions.push("Verify deleted entities are no longer referenced".to_string());
    }

    if decisions.iter().any(|d| d.might_be_invalidated) {
        suggestions.push("Review decisions that may be invalidated by this change".to_string());
    }

    if changed.total() > 20 {
        suggestions.push("Consider splitting this change into smaller PRs".to_string());
    }

    let untested: Vec<&str> = changed
        .added
        .iter()
        .map(String::as_str)
        .filter(|path| is_untested_code(path))
        .collect();
    if !untested.is_empty() {
        suggestions.push(format!(
            "Add tests for new files: {}",
            untested.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
    }

    suggestions
}
