//! # cairn-config
//!
//! Layered configuration loading for Cairn using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CAIRN_*` prefix, `__` as separator)
//! 2. Project-level `.cairn/config.toml`
//! 3. User-level `~/.config/cairn/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `CAIRN_HOOKS__VALIDATE_ON_PUSH` -> `hooks.validate_on_push`,
//! `CAIRN_TOOLS__ENDPOINT` -> `tools.endpoint`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cairn_config::CairnConfig;
//!
//! let config = CairnConfig::load_with_dotenv().expect("config");
//! if config.hooks.validate_on_push {
//!     println!("pushes are validated against {}", config.tools.endpoint);
//! }
//! ```

mod embeddings;
mod error;
mod general;
mod hooks;
mod linker;
mod tools;

pub use embeddings::EmbeddingConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use hooks::HookConfig;
pub use linker::LinkerConfig;
pub use tools::ToolsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative location of the local config file.
pub const LOCAL_CONFIG_PATH: &str = ".cairn/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CairnConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub hooks: HookConfig,
    #[serde(default)]
    pub linker: LinkerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
}

impl CairnConfig {
    /// Load configuration relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration for the project rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load_from(root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for a project root.
    pub fn figment(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = root.join(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CAIRN_").split("__"))
    }

    /// Reject values that would make hooks or linking misbehave.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("linker.min_similarity", self.linker.min_similarity),
            ("linker.prune_threshold", self.linker.prune_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{value} is not within 0..=1")));
            }
        }
        if self.linker.max_links == 0 {
            return Err(ConfigError::invalid("linker.max_links", "must be at least 1"));
        }
        if self.linker.max_per_entity == 0 {
            return Err(ConfigError::invalid("linker.max_per_entity", "must be at least 1"));
        }
        if self.hooks.max_files_to_index == 0 {
            return Err(ConfigError::invalid("hooks.max_files_to_index", "must be at least 1"));
        }
        if self.general.project_id.is_empty() {
            return Err(ConfigError::invalid("general.project_id", "must not be empty"));
        }
        Ok(())
    }

    /// Absolute database path for a project root.
    #[must_use]
    pub fn db_path(&self, root: &Path) -> PathBuf {
        root.join(&self.general.db_path)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cairn").join("config.toml"))
    }
}
