use clap::{Args, Subcommand};

use super::subcommands::{HookCommands, HooksCommands, LinkCommands};

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Git hook entrypoint, called from .git/hooks scripts.
    Hook {
        #[command(subcommand)]
        action: HookCommands,
    },
    /// Hook audit trail and saved impact reports.
    Hooks {
        #[command(subcommand)]
        action: HooksCommands,
    },
    /// Analyze the impact of the changes between two refs.
    Impact(ImpactArgs),
    /// Extract structural relationships from parser output and store them.
    Ingest(IngestArgs),
    /// Discover and manage semantic links.
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ImpactArgs {
    /// Base ref of the comparison.
    #[arg(long, default_value = "main")]
    pub base: String,

    /// Target ref of the comparison.
    #[arg(long, default_value = "HEAD")]
    pub target: String,

    /// Persist the report in the audit trail.
    #[arg(long)]
    pub save: bool,
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// Parse-result JSON files. Each holds one result or an array of them.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Print the extracted relationships without storing anything.
    #[arg(long)]
    pub dry_run: bool,
}
