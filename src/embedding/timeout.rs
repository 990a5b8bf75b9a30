//! Per-call deadline for slow or remote providers.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::EmbeddingProvider;
use crate::error::{VectorResult, VectorStoreError};
use crate::vector::VectorDimension;

/// Aborts an embedding call that exceeds `timeout`.
///
/// The inner future is dropped on expiry. Store and search never hold a
/// lock across an embedding call, so an aborted call leaves no partial state.
pub struct TimeoutProvider {
    inner: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn expired(&self) -> VectorStoreError {
        tracing::warn!(
            provider = self.inner.name(),
            timeout_ms = self.timeout.as_millis() as u64,
            "embedding call timed out"
        );
        VectorStoreError::provider_failure(
            self.inner.name(),
            format!("timed out after {}ms", self.timeout.as_millis()),
        )
    }
}

#[async_trait]
impl EmbeddingProvider for TimeoutProvider {
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        tokio::time::timeout(self.timeout, self.inner.embed(text))
            .await
            .map_err(|_| self.expired())?
    }

    async fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        tokio::time::timeout(self.timeout, self.inner.embed_batch(texts))
            .await
            .map_err(|_| self.expired())?
    }

    fn dimension(&self) -> VectorDimension {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl std::fmt::Debug for TimeoutProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutProvider")
            .field("inner", &self.inner.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
