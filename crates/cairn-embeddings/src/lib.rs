//! # cairn-embeddings
//!
//! Local embedding generation for Cairn using fastembed (ONNX runtime).
//!
//! Entity text (summary, content or name) is turned into 384-dimensional
//! vectors without any external API. The semantic linker ranks candidate
//! links by cosine similarity over these vectors.
//!
//! ## Model
//!
//! Uses [`AllMiniLML6V2`](fastembed::EmbeddingModel::AllMiniLML6V2):
//! - 384-dimensional output vectors
//! - Mean pooling, no query/passage prefix
//! - ~80MB, cached at `~/.cairn/cache/fastembed/` unless configured otherwise
//!
//! ## Async usage
//!
//! The ONNX runtime is synchronous and needs `&mut self`. [`LocalEmbedder`]
//! owns the engine behind a mutex and runs inference on
//! [`tokio::task::spawn_blocking`], exposing the async [`Embedder`] trait.

pub mod error;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
pub use error::EmbeddingError;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

/// Name recorded alongside stored vectors.
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Local embedding engine backed by fastembed.
///
/// [`TextEmbedding::embed`] requires `&mut self`; share it through
/// [`LocalEmbedder`] rather than directly.
pub struct EmbeddingEngine {
    model: TextEmbedding,
}

impl EmbeddingEngine {
    /// Create an engine with the `AllMiniLML6V2` model.
    ///
    /// `cache_dir` overrides the model cache; `None` uses
    /// [`default_cache_dir`]. Downloads the model on first run.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let cache_dir = cache_dir.unwrap_or_else(default_cache_dir);
        tracing::debug!(cache = %cache_dir.display(), "loading embedding model");

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(true),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self { model })
    }

    /// Embed a batch of texts. Returns one 384-dim vector per input.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if the ONNX inference fails.
    pub fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.model
            .embed(texts, None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails, or
    /// [`EmbeddingError::EmptyResult`] if the model returns no embeddings.
    pub fn embed_single(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.embed_batch(vec![text.to_string()])?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }

    /// Embedding vector dimensionality (always 384 for `AllMiniLML6V2`).
    #[must_use]
    pub const fn dimension() -> usize {
        384
    }
}

/// `~/.cairn/cache/fastembed/`, or `.fastembed_cache` without a home directory.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".cairn").join("cache").join("fastembed"),
    )
}

/// Async text embedding.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Model identifier stored with each vector.
    fn model_name(&self) -> &str;

    /// Embed one text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(vec![text.to_string()])
            .await?
            .pop()
            .ok_or(EmbeddingError::EmptyResult)
    }
}

/// [`EmbeddingEngine`] on the blocking thread pool.
#[derive(Clone)]
pub struct LocalEmbedder {
    engine: Arc<Mutex<EmbeddingEngine>>,
}

impl LocalEmbedder {
    #[must_use]
    pub fn new(engine: EmbeddingEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Load the model on the blocking pool and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if the model cannot load.
    pub async fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let engine = tokio::task::spawn_blocking(move || EmbeddingEngine::new(cache_dir))
            .await
            .map_err(|e| EmbeddingError::TaskFailed(e.to_string()))??;
        Ok(Self::new(engine))
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .map_err(|e| EmbeddingError::TaskFailed(format!("engine lock poisoned: {e}")))?;
            engine.embed_batch(texts)
        })
        .await
        .map_err(|e| EmbeddingError::TaskFailed(e.to_string()))?
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
