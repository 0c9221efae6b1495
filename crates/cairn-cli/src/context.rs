use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cairn_config::CairnConfig;
use cairn_db::GraphDb;
use cairn_hooks::{HttpToolClient, ToolClient};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: CairnConfig,
    pub db: Arc<GraphDb>,
}

impl AppContext {
    /// Open the project database, creating its directory if needed.
    pub async fn init(project_root: PathBuf, config: CairnConfig) -> anyhow::Result<Self> {
        let db_path = config.db_path(&project_root);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let db = GraphDb::open_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open graph database at {}", db_path.display()))?;

        Ok(Self {
            project_root,
            config,
            db: Arc::new(db),
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.config.general.project_id
    }

    /// The configured tool endpoint, if any.
    pub fn tools(&self) -> anyhow::Result<Option<Arc<dyn ToolClient>>> {
        let client = HttpToolClient::from_config(&self.config.tools)
            .context("failed to build tool client")?;
        Ok(client.map(|c| Arc::new(c) as Arc<dyn ToolClient>))
    }
}

/// Emit warnings for env keys that look like config but were not picked up.
pub fn warn_unconfigured(config: &CairnConfig) {
    for warning in unconfigured_warnings(config, std::env::vars().map(|(key, _)| key)) {
        tracing::warn!("{warning}");
    }
}

fn unconfigured_warnings<I>(config: &CairnConfig, env_keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let keys = env_keys.into_iter().collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.tools.is_configured()
        && keys.iter().any(|k| k.starts_with("CAIRN_TOOLS") && !k.starts_with("CAIRN_TOOLS__"))
    {
        warnings.push(
            "Tool endpoint is unset while CAIRN_TOOLS* env vars exist. Use double underscores (example: CAIRN_TOOLS__ENDPOINT)."
                .to_string(),
        );
    }

    for (section, prefix) in [("hooks", "CAIRN_HOOKS_"), ("linker", "CAIRN_LINKER_")] {
        if keys.iter().any(|k| k.starts_with(prefix) && !k.starts_with(&format!("{prefix}_"))) {
            warnings.push(format!(
                "{prefix}* env vars are ignored. Use double underscores for {section} settings (example: {prefix}_MAX_FILES_TO_INDEX)."
            ));
        }
    }

    warnings
}
