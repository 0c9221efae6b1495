use std::path::PathBuf;

use cairn_core::errors::StoreError;
use thiserror::Error;

/// Failures calling the external tool capability.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("tool API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The tool ran and reported a failure.
    #[error("tool '{tool}' failed: {message}")]
    Failed { tool: String, message: String },

    #[error("malformed tool response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("git error: {0}")]
    Git(String),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a git repository: {0}")]
    NotGitRepo(PathBuf),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
