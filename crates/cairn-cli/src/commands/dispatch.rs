use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to its handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Hook { action } => commands::hook::handle(&action, ctx, flags).await,
        Commands::Hooks { action } => commands::hooks::handle(&action, ctx, flags).await,
        Commands::Impact(args) => commands::impact::handle(&args, ctx, flags).await,
        Commands::Ingest(args) => commands::ingest::handle(&args, ctx, flags).await,
        Commands::Link { action } => commands::link::handle(&action, ctx, flags).await,
    }
}
