pub mod global;
pub mod root_commands;
pub mod subcommands;

use clap::Parser;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Cairn - keeps a code knowledge graph in step with git.
#[derive(Debug, Parser)]
#[command(name = "cairn", version, about = "Cairn - code knowledge graph maintenance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format.
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Maximum number of rows for list commands.
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root. Defaults to the enclosing git work tree.
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use crate::cli::subcommands::{HookCommands, LinkCommands};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "cairn", "--format", "table", "--limit", "7", "-v", "hooks", "history",
        ])
        .unwrap();
        let flags = cli.global_flags();
        assert_eq!(flags.format, OutputFormat::Table);
        assert_eq!(flags.limit, Some(7));
        assert!(flags.verbose);
        assert!(!flags.quiet);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cairn", "impact", "--base", "develop", "-f", "raw"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Raw);
        let Commands::Impact(args) = cli.command else {
            panic!("expected impact command");
        };
        assert_eq!(args.base, "develop");
        assert_eq!(args.target, "HEAD");
    }

    #[test]
    fn hook_names_are_kebab_case() {
        let cli = Cli::try_parse_from(["cairn", "hook", "pre-push", "origin", "git@host:repo"]).unwrap();
        let Commands::Hook { action } = cli.command else {
            panic!("expected hook command");
        };
        assert!(matches!(action, HookCommands::PrePush(_)));

        let cli = Cli::try_parse_from(["cairn", "hook", "post-checkout", "abc", "def", "1"]).unwrap();
        let Commands::Hook {
            action: HookCommands::PostCheckout(args),
        } = cli.command
        else {
            panic!("expected post-checkout");
        };
        assert_eq!(args.previous_head.as_deref(), Some("abc"));
        assert_eq!(args.branch_checkout.as_deref(), Some("1"));
    }

    #[test]
    fn link_discover_accepts_type_list() {
        let cli = Cli::try_parse_from([
            "cairn",
            "link",
            "discover",
            "--types",
            "function,class",
            "--min-similarity",
            "0.8",
        ])
        .unwrap();
        let Commands::Link {
            action: LinkCommands::Discover(args),
        } = cli.command
        else {
            panic!("expected link discover");
        };
        assert_eq!(args.types, vec!["function".to_string(), "class".to_string()]);
        assert_eq!(args.min_similarity, Some(0.8));
        assert!(!args.include_linked);
    }

    #[test]
    fn ingest_requires_a_file() {
        assert!(Cli::try_parse_from(["cairn", "ingest"]).is_err());
    }
}
