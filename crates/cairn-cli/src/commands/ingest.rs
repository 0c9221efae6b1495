use anyhow::Context;
use cairn_db::IngestStats;
use cairn_extract::{ExtractedRelationship, ExtractorRegistry, ParseResult};
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IngestArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct IngestedFile {
    file_path: String,
    language: &'static str,
    relationships_extracted: usize,
    #[serde(flatten)]
    stats: IngestStats,
}

/// Handle `cairn ingest`.
pub async fn handle(args: &IngestArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = ExtractorRegistry::default();
    let mut parsed = Vec::new();
    for path in &args.files {
        let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        parsed.extend(parse_results(&raw).with_context(|| format!("invalid parse result in {path}"))?);
    }

    if args.dry_run {
        let edges: Vec<ExtractedRelationship> = parsed
            .iter()
            .filter_map(|result| extractor_for(&registry, result).map(|e| e.extract(result)))
            .flatten()
            .collect();
        return output(&edges, flags.format);
    }

    let progress = Progress::bar(parsed.len() as u64, "Ingesting");
    let mut rows = Vec::with_capacity(parsed.len());
    for result in &parsed {
        progress.set_message(&result.file_path);
        let Some(extractor) = extractor_for(&registry, result) else {
            tracing::warn!(file = %result.file_path, language = %result.language, "no extractor for file, skipping");
            progress.inc(1);
            continue;
        };
        let edges = extractor.extract(result);
        let stats = match ctx.db.ingest(result, &edges).await {
            Ok(stats) => stats,
            Err(error) => {
                progress.finish_err("Ingest failed");
                return Err(error).context(format!("failed to ingest {}", result.file_path));
            }
        };
        tracing::debug!(file = %result.file_path, edges = edges.len(), ?stats, "ingested file");
        rows.push(IngestedFile {
            file_path: result.file_path.clone(),
            language: extractor.language(),
            relationships_extracted: edges.len(),
            stats,
        });
        progress.inc(1);
    }
    progress.finish_ok(&format!("Ingested {} files", rows.len()));

    output(&rows, flags.format)
}

/// Language name first, then the file extension.
fn extractor_for<'r>(
    registry: &'r ExtractorRegistry,
    result: &ParseResult,
) -> Option<&'r cairn_extract::StructuralExtractor> {
    registry
        .get(&result.language)
        .or_else(|| registry.get(&result.file_path))
}

/// A file holds one parse result or an array of them.
fn parse_results(raw: &str) -> serde_json::Result<Vec<ParseResult>> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|result| vec![result])
    }
}
