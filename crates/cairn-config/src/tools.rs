//! Remote tool endpoint used for indexing and search.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Base URL of the tool server, e.g. `http://127.0.0.1:7777`.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ToolsConfig {
    /// An empty endpoint means hooks run without a tool client.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }
}
