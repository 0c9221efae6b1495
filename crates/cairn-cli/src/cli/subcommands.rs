use clap::{Args, Subcommand, ValueEnum};

#[derive(Clone, Debug, Subcommand)]
pub enum HookCommands {
    /// Index staged files before they are committed.
    #[command(name = "pre-commit")]
    PreCommit,
    /// Sync merged files and write an impact report.
    #[command(name = "post-merge")]
    PostMerge(PostMergeArgs),
    /// Block the push when the index is stale.
    #[command(name = "pre-push")]
    PrePush(PrePushArgs),
    /// Record a branch switch.
    #[command(name = "post-checkout")]
    PostCheckout(PostCheckoutArgs),
}

/// Arguments git passes to the post-merge hook.
#[derive(Clone, Debug, Args)]
pub struct PostMergeArgs {
    /// `1` for a squash merge.
    pub squash: Option<String>,
}

/// Arguments git passes to the pre-push hook.
#[derive(Clone, Debug, Args)]
pub struct PrePushArgs {
    pub remote: Option<String>,
    pub url: Option<String>,
}

/// Arguments git passes to the post-checkout hook.
#[derive(Clone, Debug, Args)]
pub struct PostCheckoutArgs {
    pub previous_head: Option<String>,
    pub new_head: Option<String>,
    /// `1` for a branch checkout, `0` for a file checkout.
    pub branch_checkout: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum HooksCommands {
    /// List recent hook executions.
    History {
        /// Only this hook (pre-commit, post-merge, pre-push, post-checkout).
        #[arg(long)]
        hook: Option<String>,
    },
    /// List saved impact reports.
    Reports,
}

#[derive(Clone, Debug, Subcommand)]
pub enum LinkCommands {
    /// Scan the graph and link similar entities.
    Discover(DiscoverArgs),
    /// Link one or more entities to their nearest neighbours.
    Entity(EntityLinkArgs),
    /// Delete semantic links weaker than a threshold.
    Prune(PruneArgs),
    /// Suggest links for an entity without creating them.
    Suggest(SuggestArgs),
    /// Find entities similar to free text, or concepts related to an entity.
    Related(RelatedArgs),
    /// List the semantic links of an entity.
    Links(LinksArgs),
}

#[derive(Clone, Debug, Args)]
pub struct DiscoverArgs {
    /// Entity types to scan (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,

    #[arg(long)]
    pub min_similarity: Option<f64>,

    #[arg(long)]
    pub max_per_entity: Option<usize>,

    /// Relationship tag written on new links.
    #[arg(long)]
    pub relationship: Option<String>,

    /// Also scan entities that already have semantic links.
    #[arg(long)]
    pub include_linked: bool,
}

#[derive(Clone, Debug, Args)]
pub struct EntityLinkArgs {
    /// Entity ids. More than one runs a batch.
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[arg(long)]
    pub max_links: Option<usize>,

    #[arg(long)]
    pub min_similarity: Option<f64>,

    /// Also create reverse links.
    #[arg(long)]
    pub bidirectional: bool,

    /// Replace existing semantic links instead of adding to them.
    #[arg(long)]
    pub refresh: bool,

    #[arg(long)]
    pub relationship: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct PruneArgs {
    /// Links below this weight are deleted. Defaults to `linker.prune_threshold`.
    #[arg(long)]
    pub min_weight: Option<f64>,

    #[arg(long)]
    pub relationship: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SuggestArgs {
    pub id: String,

    #[arg(long)]
    pub min_similarity: Option<f64>,

    /// Candidate entity types (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RelatedArgs {
    /// Free text, or an entity id with `--concepts`.
    pub query: String,

    /// Treat the query as an entity id and return related concepts.
    #[arg(long)]
    pub concepts: bool,

    #[arg(long)]
    pub min_similarity: Option<f64>,

    /// Candidate entity types (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct LinksArgs {
    pub id: String,

    #[arg(long, value_enum, default_value = "both")]
    pub direction: DirectionArg,

    #[arg(long)]
    pub min_weight: Option<f64>,

    #[arg(long)]
    pub relationship: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    In,
    Out,
    Both,
}
