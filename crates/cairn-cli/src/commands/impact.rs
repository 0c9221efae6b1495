use anyhow::Context;
use cairn_hooks::{AnalyzeOptions, ImpactAnalyzer};

use crate::cli::root_commands::ImpactArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `cairn impact`.
pub async fn handle(args: &ImpactArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tools = ctx.tools()?;
    if tools.is_none() {
        tracing::info!("no tool endpoint configured; entity and decision lookups are skipped");
    }

    let progress = Progress::spinner(&format!("Analyzing {}..{}", args.base, args.target));
    let report = ImpactAnalyzer::new(tools)
        .analyze(&AnalyzeOptions {
            repo_path: ctx.project_root.clone(),
            base_branch: args.base.clone(),
            target_branch: args.target.clone(),
        })
        .await;
    progress.finish_clear();

    if args.save {
        let id = ctx
            .db
            .save_impact_report(ctx.project_id(), &report)
            .await
            .context("failed to save impact report")?;
        tracing::info!(%id, "saved impact report");
    }

    match flags.format {
        OutputFormat::Table => {
            print!("{}", report.summary());
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format),
    }
}
