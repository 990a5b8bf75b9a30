//! Deterministic hash-derived embedding.
//!
//! This is a stub, not a semantic embedding. Identical text always yields an
//! identical vector and different text almost always yields a different one,
//! but semantically similar text is not numerically close. It exists so the
//! engine runs and tests without a live model.
//!
//! Derivation: SHA-256 of the UTF-8 bytes, each digest byte divided by 255,
//! then zero-padded (or truncated) to exactly the configured width.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;
use crate::error::VectorResult;
use crate::vector::VectorDimension;

/// Compute the fallback embedding of `text` at width `dimension`.
pub fn hash_embedding(text: &str, dimension: VectorDimension) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());

    let mut embedding: Vec<f32> = digest
        .iter()
        .take(dimension.get())
        .map(|&b| f32::from(b) / f32::from(u8::MAX))
        .collect();
    embedding.resize(dimension.get(), 0.0);
    embedding
}

/// Provider backed by [`hash_embedding`].
#[derive(Debug, Clone, Copy)]
pub struct HashEmbeddingProvider {
    dimension: VectorDimension,
}

impl HashEmbeddingProvider {
    pub fn new(dimension: VectorDimension) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(VectorDimension::dimension_384())
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        Ok(hash_embedding(text, self.dimension))
    }

    async fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| hash_embedding(t, self.dimension))
            .collect())
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}
