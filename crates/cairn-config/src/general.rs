//! Project identity and storage location.

use serde::{Deserialize, Serialize};

fn default_project_id() -> String {
    "default".to_string()
}

fn default_db_path() -> String {
    ".cairn/graph.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Identifier written to every audit row.
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// libSQL database file, relative to the repository root.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            db_path: default_db_path(),
        }
    }
}
