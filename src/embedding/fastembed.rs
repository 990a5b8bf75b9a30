//! FastEmbed embedding provider.
//!
//! Wraps a locally downloaded transformer model. `TextEmbedding` needs
//! exclusive access per call, so the model sits behind a mutex and every call
//! runs on the blocking pool via `spawn_blocking`.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::sync::Arc;

use super::EmbeddingProvider;
use crate::error::{VectorResult, VectorStoreError};
use crate::vector::VectorDimension;

/// Map a model name to a fastembed model.
pub fn parse_embedding_model(name: &str) -> VectorResult<EmbeddingModel> {
    match name {
        "AllMiniLML6V2" | "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "BGESmallENV15" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BGEBaseENV15" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "BGELargeENV15" | "bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
        other => Err(VectorStoreError::invalid_argument(format!(
            "unknown embedding model '{other}'. Supported: AllMiniLML6V2, BGESmallENV15, BGEBaseENV15, BGELargeENV15"
        ))),
    }
}

/// Local model provider.
///
/// | Name | Dimension |
/// |------|-----------|
/// | `AllMiniLML6V2` | 384 |
/// | `BGESmallENV15` | 384 |
/// | `BGEBaseENV15` | 768 |
/// | `BGELargeENV15` | 1024 |
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    dimension: VectorDimension,
    model_name: String,
}

impl FastEmbedProvider {
    /// Load (downloading on first use) the named model.
    ///
    /// The output width is probed with a test embedding.
    pub fn new(model_name: &str) -> VectorResult<Self> {
        let model = parse_embedding_model(model_name)?;
        let failure = |e: String| VectorStoreError::provider_failure("fastembed", e);

        let mut text_model =
            TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
                .map_err(|e| failure(format!("failed to initialize model: {e}")))?;

        let probe = text_model
            .embed(vec!["dimension probe"], None)
            .map_err(|e| failure(format!("failed to probe dimension: {e}")))?;
        let width = probe
            .first()
            .map(Vec::len)
            .ok_or_else(|| failure("empty probe embedding".to_string()))?;

        tracing::info!(model = model_name, dimension = width, "fastembed model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(text_model)),
            dimension: VectorDimension::new(width)?,
            model_name: model_name.to_string(),
        })
    }

    async fn run(&self, texts: Vec<String>) -> VectorResult<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || {
            let mut model = model.lock();
            model
                .embed(texts, None)
                .map_err(|e| VectorStoreError::provider_failure("fastembed", e.to_string()))
        })
        .await
        .map_err(|e| VectorStoreError::internal(format!("embedding task failed: {e}")))?
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VectorStoreError::provider_failure("fastembed", "no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run(texts.iter().map(|t| t.to_string()).collect()).await
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}
