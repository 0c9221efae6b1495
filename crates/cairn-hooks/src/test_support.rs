//! Shared fixtures: throwaway git repositories and a scripted tool client.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;
use crate::tools::ToolClient;

/// `git init` on `main` with a committer identity configured.
pub fn init_repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("create tempdir");
    let root = dir.path().to_path_buf();
    run_git(&root, &["init", "--initial-branch=main"]);
    run_git(&root, &["config", "user.email", "test@cairn.dev"]);
    run_git(&root, &["config", "user.name", "Cairn Test"]);
    run_git(&root, &["config", "commit.gpgsign", "false"]);
    (dir, root)
}

/// Write `filename` and commit it.
pub fn commit_file(root: &Path, filename: &str, content: &str, message: &str) {
    let path = root.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    run_git(root, &["add", filename]);
    run_git(root, &["commit", "-m", message]);
}

/// Run git and assert success. Returns stdout.
pub fn run_git(root: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .unwrap_or_else(|e| panic!("git {} failed: {e}", args.join(" ")));
    assert!(
        output.status.success(),
        "git {} failed:\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn head(root: &Path) -> String {
    run_git(root, &["rev-parse", "HEAD"]).trim().to_string()
}

type Handler = Box<dyn Fn(&Value) -> Result<Value, ToolError> + Send + Sync>;

/// Answers tool calls from per-tool closures and records every call.
/// Unscripted tools fail.
#[derive(Default)]
pub struct ScriptedTools {
    handlers: HashMap<String, Handler>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        tool: &str,
        handler: impl Fn(&Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(tool.to_string(), Box::new(handler));
        self
    }

    /// Always answer `tool` with `result`.
    pub fn returning(self, tool: &str, result: Value) -> Self {
        self.on(tool, move |_| Ok(result.clone()))
    }

    pub fn failing(self, tool: &str) -> Self {
        let name = tool.to_string();
        self.on(tool, move |_| {
            Err(ToolError::Failed {
                tool: name.clone(),
                message: "scripted failure".into(),
            })
        })
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, tool: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == tool)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait]
impl ToolClient for ScriptedTools {
    async fn call_tool(&self, name: &str, params: Value) -> Result<Value, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), params.clone()));
        match self.handlers.get(name) {
            Some(handler) => handler(&params),
            None => Err(ToolError::Failed {
                tool: name.to_string(),
                message: "not scripted".into(),
            }),
        }
    }
}
