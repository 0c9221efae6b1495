//! External tool capability.
//!
//! Hooks and the impact analyzer never touch the index or the decision log
//! directly. They call named tools (`index_files`, `index_status`,
//! `entity_search`, `entity_references`, `decision_search`,
//! `context_query`) through [`ToolClient`].

use std::time::Duration;

use async_trait::async_trait;
use cairn_config::ToolsConfig;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ToolError;

#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Invoke `name` with JSON `params` and return its result object.
    async fn call_tool(&self, name: &str, params: Value) -> Result<Value, ToolError>;
}

/// `POST {endpoint}/tools/{name}` with the params as the JSON body.
///
/// The server answers `{"result": ...}` on success or `{"error": "..."}`.
pub struct HttpToolClient {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ToolResponse {
    result: Option<Value>,
    error: Option<String>,
}

impl HttpToolClient {
    /// # Errors
    ///
    /// Returns [`ToolError::Http`] if the underlying client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cairn/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// A client for the configured endpoint, or `None` when no endpoint is set.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &ToolsConfig) -> Result<Option<Self>, ToolError> {
        if !config.is_configured() {
            return Ok(None);
        }
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    #[must_use]
    pub fn tool_url(&self, name: &str) -> String {
        format!("{}/tools/{name}", self.endpoint)
    }
}

#[async_trait]
impl ToolClient for HttpToolClient {
    async fn call_tool(&self, name: &str, params: Value) -> Result<Value, ToolError> {
        tracing::debug!(tool = name, "calling tool");
        let resp = self
            .http
            .post(self.tool_url(name))
            .json(&params)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let body: ToolResponse = resp.json().await?;
        unwrap_response(name, body)
    }
}

/// Map a non-success status to [`ToolError::Api`] with the response body.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ToolError> {
    if !resp.status().is_success() {
        return Err(ToolError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn unwrap_response(tool: &str, body: ToolResponse) -> Result<Value, ToolError> {
    match body {
        ToolResponse {
            error: Some(message),
            ..
        } => Err(ToolError::Failed {
            tool: tool.to_string(),
            message,
        }),
        ToolResponse {
            result: Some(result),
            ..
        } => Ok(result),
        ToolResponse { .. } => Err(ToolError::Malformed(format!(
            "'{tool}' returned neither result nor error"
        ))),
    }
}
