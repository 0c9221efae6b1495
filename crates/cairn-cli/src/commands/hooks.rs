use anyhow::Context;
use cairn_core::enums::HookType;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::HooksCommands;
use crate::commands::shared::{effective_limit, parse_enum};
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_LIMIT: u32 = 20;

/// Handle `cairn hooks history|reports`.
pub async fn handle(action: &HooksCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(None, flags.limit, DEFAULT_LIMIT);
    match action {
        HooksCommands::History { hook } => {
            let hook = hook
                .as_deref()
                .map(|raw| parse_enum::<HookType>(raw, "hook"))
                .transpose()?;
            let rows = ctx
                .db
                .list_hook_executions(ctx.project_id(), hook, limit)
                .await
                .context("failed to list hook executions")?;
            output(&rows, flags.format)
        }
        HooksCommands::Reports => {
            let reports = ctx
                .db
                .list_impact_reports(ctx.project_id(), limit)
                .await
                .context("failed to list impact reports")?;
            output(&reports, flags.format)
        }
    }
}
