//! Local embedding model settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Model cache directory. Empty uses `~/.cairn/cache/fastembed/`.
    #[serde(default)]
    pub cache_dir: String,
}
