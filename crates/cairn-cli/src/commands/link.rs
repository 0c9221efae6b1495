use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use cairn_config::LinkerConfig;
use cairn_core::enums::{Direction, EntityType};
use cairn_db::GraphDb;
use cairn_embeddings::LocalEmbedder;
use cairn_linker::{
    DiscoverOptions, LinkOptions, RelatedOptions, SemanticLinker, SemanticLinksOptions,
    SimilarityError, SimilarityMatch, SimilarityOptions, SimilaritySearch, SuggestionOptions,
    VectorSimilarity,
};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{
    DirectionArg, DiscoverArgs, EntityLinkArgs, LinkCommands, LinksArgs, PruneArgs, RelatedArgs,
    SuggestArgs,
};
use crate::commands::shared::{effective_limit, parse_edge_type, parse_entity_types};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

const EMBED_BATCH: u32 = 128;
const DEFAULT_RESULTS: u32 = 10;

type VectorLinker = SemanticLinker<GraphDb, VectorSimilarity<LocalEmbedder>>;

/// Similarity backend for commands that only read or delete existing links.
struct NoSimilarity;

#[async_trait]
impl SimilaritySearch for NoSimilarity {
    async fn find_similar(
        &self,
        _text: &str,
        _opts: &SimilarityOptions,
    ) -> Result<Vec<SimilarityMatch>, SimilarityError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Serialize)]
struct PruneOutput {
    pruned: u32,
    min_weight: f64,
    relationship: String,
}

#[derive(Debug, Serialize)]
struct Refreshed {
    entity_id: String,
    #[serde(flatten)]
    result: cairn_linker::UpdateResult,
}

/// Handle `cairn link <action>`.
pub async fn handle(action: &LinkCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = &ctx.config.linker;
    match action {
        LinkCommands::Discover(args) => {
            let opts = discover_options(config, args)?;
            let linker = vector_linker(ctx, &opts.entity_types).await?;

            let progress = Progress::spinner("Discovering semantic links");
            let result = linker
                .discover_relationships(&opts, |p| {
                    progress.set_message(&format!(
                        "{} {}: {} processed, {} created",
                        p.entity_type, p.entity_id, p.processed, p.created
                    ));
                })
                .await;
            match result {
                Ok(result) => {
                    progress.finish_clear();
                    tracing::info!(created = result.created, processed = result.entities_processed, "discovery finished");
                    output(&result, flags.format)
                }
                Err(error) => {
                    progress.finish_err("Discovery failed");
                    Err(error).context("semantic discovery failed")
                }
            }
        }
        LinkCommands::Entity(args) => {
            let opts = link_options(config, args)?;
            let linker = vector_linker(ctx, &[]).await?;
            if args.refresh {
                let mut refreshed = Vec::with_capacity(args.ids.len());
                for id in &args.ids {
                    let result = linker
                        .update_links(id, &opts)
                        .await
                        .with_context(|| format!("failed to refresh links for {id}"))?;
                    refreshed.push(Refreshed {
                        entity_id: id.clone(),
                        result,
                    });
                }
                return output(&refreshed, flags.format);
            }

            if let [id] = args.ids.as_slice() {
                let result = linker
                    .link_new_entity(id, &opts)
                    .await
                    .with_context(|| format!("failed to link {id}"))?;
                return output(&result, flags.format);
            }

            let progress = Progress::bar(args.ids.len() as u64, "Linking");
            let result = linker
                .batch_link(&args.ids, &opts, |p| {
                    progress.inc(1);
                    progress.set_message(&p.entity_id);
                })
                .await;
            progress.finish_clear();
            if result.failed > 0 {
                tracing::warn!(failed = result.failed, "some entities could not be linked");
            }
            output(&result, flags.format)
        }
        LinkCommands::Prune(args) => prune(args, ctx, flags).await,
        LinkCommands::Suggest(args) => {
            let opts = SuggestionOptions {
                limit: effective_limit(None, flags.limit, DEFAULT_RESULTS) as usize,
                min_similarity: args
                    .min_similarity
                    .unwrap_or(SuggestionOptions::default().min_similarity),
                relationship: config.relationship,
                entity_types: parse_entity_types(&args.types)?,
            };
            let linker = vector_linker(ctx, &[]).await?;
            let suggestions = linker
                .get_suggestions(&args.id, &opts)
                .await
                .with_context(|| format!("failed to suggest links for {}", args.id))?;
            output(&suggestions, flags.format)
        }
        LinkCommands::Related(args) => related(args, ctx, flags).await,
        LinkCommands::Links(args) => links(args, ctx, flags).await,
    }
}

async fn prune(args: &PruneArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = &ctx.config.linker;
    let min_weight = args.min_weight.unwrap_or(config.prune_threshold);
    let relationship = parse_edge_type(args.relationship.as_deref(), config.relationship)?;

    let linker = SemanticLinker::new(Arc::clone(&ctx.db), NoSimilarity);
    let pruned = linker
        .prune_weak_links(min_weight, relationship)
        .await
        .context("failed to prune weak links")?;
    output(
        &PruneOutput {
            pruned,
            min_weight,
            relationship: relationship.to_string(),
        },
        flags.format,
    )
}

async fn related(args: &RelatedArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let opts = RelatedOptions {
        limit: effective_limit(None, flags.limit, DEFAULT_RESULTS) as usize,
        min_similarity: args
            .min_similarity
            .unwrap_or(RelatedOptions::default().min_similarity),
        entity_types: parse_entity_types(&args.types)?,
    };
    let linker = vector_linker(ctx, &[]).await?;
    let matches = if args.concepts {
        linker
            .find_related_concepts(&args.query, &opts)
            .await
            .with_context(|| format!("failed to find concepts related to {}", args.query))?
    } else {
        linker
            .find_related(&args.query, &opts)
            .await
            .context("similarity search failed")?
    };
    output(&matches, flags.format)
}

async fn links(args: &LinksArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let opts = SemanticLinksOptions {
        direction: match args.direction {
            DirectionArg::In => Direction::In,
            DirectionArg::Out => Direction::Out,
            DirectionArg::Both => Direction::Both,
        },
        min_weight: args.min_weight,
        relationship: parse_edge_type(args.relationship.as_deref(), ctx.config.linker.relationship)?,
    };
    let linker = SemanticLinker::new(Arc::clone(&ctx.db), NoSimilarity);
    let edges = linker
        .get_semantic_links(&args.id, &opts)
        .await
        .with_context(|| format!("failed to list links for {}", args.id))?;
    output(&edges, flags.format)
}

/// Load the embedding model, embed entities that have no vector yet, and
/// build a linker over the stored vectors. Empty `types` means every type.
async fn vector_linker(ctx: &AppContext, types: &[EntityType]) -> anyhow::Result<VectorLinker> {
    let cache_dir = &ctx.config.embeddings.cache_dir;
    let cache_dir = (!cache_dir.is_empty()).then(|| PathBuf::from(cache_dir));

    let progress = Progress::spinner("Loading embedding model");
    let embedder = LocalEmbedder::load(cache_dir)
        .await
        .context("failed to load embedding model")?;
    let similarity = VectorSimilarity::new(Arc::clone(&ctx.db), embedder);

    let mut embedded = 0usize;
    loop {
        let batch = ctx
            .db
            .entities_without_embedding(types, EMBED_BATCH)
            .await
            .context("failed to list entities without embeddings")?;
        if batch.is_empty() {
            break;
        }
        embedded += similarity
            .index_entities(&batch)
            .await
            .context("failed to embed entities")?;
        progress.set_message(&format!("Embedded {embedded} entities"));
    }
    progress.finish_clear();
    if embedded > 0 {
        tracing::info!(embedded, "embedded new entities");
    }

    Ok(SemanticLinker::new(Arc::clone(&ctx.db), similarity))
}

fn discover_options(config: &LinkerConfig, args: &DiscoverArgs) -> anyhow::Result<DiscoverOptions> {
    Ok(DiscoverOptions {
        entity_types: parse_entity_types(&args.types)?.unwrap_or_else(|| config.entity_types.clone()),
        min_similarity: args.min_similarity.unwrap_or(config.min_similarity),
        max_per_entity: args.max_per_entity.unwrap_or(config.max_per_entity),
        relationship: parse_edge_type(args.relationship.as_deref(), config.relationship)?,
        skip_existing: !args.include_linked,
        ..DiscoverOptions::default()
    })
}

fn link_options(config: &LinkerConfig, args: &EntityLinkArgs) -> anyhow::Result<LinkOptions> {
    Ok(LinkOptions {
        max_links: args.max_links.unwrap_or(config.max_links),
        min_similarity: args.min_similarity.unwrap_or(config.min_similarity),
        bidirectional: args.bidirectional,
        relationship: parse_edge_type(args.relationship.as_deref(), config.relationship)?,
        entity_types: None,
    })
}

#[cfg(test)]
mod tests {
    use cairn_core::enums::{EdgeType, GraphRelation};

    use super::*;
    use pretty_assertions::assert_eq;

    fn discover_args() -> DiscoverArgs {
        DiscoverArgs {
            types: Vec::new(),
            min_similarity: None,
            max_per_entity: None,
            relationship: None,
            include_linked: false,
        }
    }

    #[test]
    fn discover_defaults_come_from_config() {
        let config = LinkerConfig {
            min_similarity: 0.82,
            max_per_entity: 3,
            ..LinkerConfig::default()
        };
        let opts = discover_options(&config, &discover_args()).unwrap();
        assert_eq!(opts.min_similarity, 0.82);
        assert_eq!(opts.max_per_entity, 3);
        assert_eq!(opts.entity_types, config.entity_types);
        assert_eq!(opts.relationship, EdgeType::Graph(GraphRelation::RelatesTo));
        assert!(opts.skip_existing);
    }

    #[test]
    fn discover_flags_override_config() {
        let args = DiscoverArgs {
            types: vec!["concept".into()],
            min_similarity: Some(0.9),
            relationship: Some("MENTIONS".into()),
            include_linked: true,
            ..discover_args()
        };
        let opts = discover_options(&LinkerConfig::default(), &args).unwrap();
        assert_eq!(opts.entity_types, vec![EntityType::Concept]);
        assert_eq!(opts.min_similarity, 0.9);
        assert_eq!(opts.relationship, EdgeType::Graph(GraphRelation::Mentions));
        assert!(!opts.skip_existing);
    }

    #[test]
    fn link_options_reject_unknown_relationship() {
        let args = EntityLinkArgs {
            ids: vec!["ent-1".into()],
            max_links: Some(2),
            min_similarity: None,
            bidirectional: true,
            refresh: false,
            relationship: Some("BOGUS".into()),
        };
        assert!(link_options(&LinkerConfig::default(), &args).is_err());

        let args = EntityLinkArgs {
            relationship: None,
            ..args
        };
        let opts = link_options(&LinkerConfig::default(), &args).unwrap();
        assert_eq!(opts.max_links, 2);
        assert!(opts.bidirectional);
    }

    #[tokio::test]
    async fn no_similarity_finds_nothing() {
        let opts = SimilarityOptions {
            limit: 5,
            min_similarity: 0.0,
            entity_types: Vec::new(),
        };
        assert!(NoSimilarity.find_similar("anything", &opts).await.unwrap().is_empty());
    }
}
