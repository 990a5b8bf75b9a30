//! Embedding providers.
//!
//! An [`EmbeddingProvider`] turns text into a fixed-width vector. Two
//! implementations ship with the crate:
//!
//! - [`HashEmbeddingProvider`]: deterministic SHA-256 derived stub, always available
//! - `FastEmbedProvider`: local transformer model (requires the `fastembed` feature)
//!
//! [`TimeoutProvider`] wraps any provider with a per-call deadline.
//! [`create_provider`] builds the configured stack from [`EmbeddingConfig`].

mod hash;
mod timeout;

#[cfg(feature = "fastembed")]
mod fastembed;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{VectorResult, VectorStoreError};
use crate::vector::VectorDimension;

pub use hash::{HashEmbeddingProvider, hash_embedding};
pub use timeout::TimeoutProvider;

#[cfg(feature = "fastembed")]
pub use fastembed::{FastEmbedProvider, parse_embedding_model};

/// Trait for generating text embeddings.
///
/// Implementations must be `Send + Sync` so a single provider can be shared
/// by every request handler. Providers that wrap thread-unsafe libraries
/// handle their own synchronization.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>>;

    /// Generate embeddings for a batch of texts.
    ///
    /// Default implementation calls `embed` for each text sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The embedding dimension.
    fn dimension(&self) -> VectorDimension;

    /// The provider name for diagnostics.
    fn name(&self) -> &str;
}

/// Embed `text` and check the result against the engine width.
///
/// A provider returning the wrong width is a fatal error for that call.
/// NaN or infinite components are reported as a provider failure.
pub async fn embed_checked(
    provider: &dyn EmbeddingProvider,
    text: &str,
    dimension: VectorDimension,
) -> VectorResult<Vec<f32>> {
    let vector = provider.embed(text).await?;
    dimension.validate_vector(&vector)?;
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(VectorStoreError::provider_failure(
            provider.name(),
            "embedding contains non-finite values",
        ));
    }
    Ok(vector)
}

/// Build the provider named in the configuration.
///
/// Wraps it in a [`TimeoutProvider`] when `timeout_ms` is non-zero.
pub fn create_provider(config: &EmbeddingConfig) -> VectorResult<Arc<dyn EmbeddingProvider>> {
    let dimension = VectorDimension::new(config.dimension)?;

    let provider: Arc<dyn EmbeddingProvider> = match config.provider.as_str() {
        "hash" => Arc::new(HashEmbeddingProvider::new(dimension)),
        #[cfg(feature = "fastembed")]
        "fastembed" => {
            let provider = FastEmbedProvider::new(&config.model)?;
            if provider.dimension() != dimension {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: dimension.get(),
                    actual: provider.dimension().get(),
                });
            }
            Arc::new(provider)
        }
        #[cfg(not(feature = "fastembed"))]
        "fastembed" => {
            return Err(VectorStoreError::invalid_argument(
                "embedding provider 'fastembed' requires building with --features fastembed",
            ));
        }
        other => {
            return Err(VectorStoreError::invalid_argument(format!(
                "unknown embedding provider '{other}'. Supported: hash, fastembed"
            )));
        }
    };

    tracing::debug!(
        provider = provider.name(),
        dimension = dimension.get(),
        timeout_ms = config.timeout_ms,
        "embedding provider created"
    );

    if config.timeout_ms > 0 {
        Ok(Arc::new(TimeoutProvider::new(
            provider,
            Duration::from_millis(config.timeout_ms),
        )))
    } else {
        Ok(provider)
    }
}
