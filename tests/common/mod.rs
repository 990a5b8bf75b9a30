//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use vecsearch::{
    EmbeddingProvider, HashEmbeddingProvider, VectorDimension, VectorResult, VectorStore,
    VectorStoreError,
};

pub fn dim(n: usize) -> VectorDimension {
    VectorDimension::new(n).expect("non-zero dimension")
}

pub fn hash_store(width: usize) -> Arc<VectorStore> {
    Arc::new(VectorStore::new(Arc::new(HashEmbeddingProvider::new(dim(width)))))
}

/// Always fails, counting how often it was asked.
pub struct FailingProvider {
    pub calls: AtomicUsize,
    width: VectorDimension,
}

impl FailingProvider {
    pub fn new(width: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            width: dim(width),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed(&self, _text: &str) -> VectorResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(VectorStoreError::provider_failure("failing", "service unreachable"))
    }

    fn dimension(&self) -> VectorDimension {
        self.width
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Blocks every embedding call until `release` is notified.
pub struct GatedProvider {
    pub entered: Notify,
    pub release: Notify,
    inner: HashEmbeddingProvider,
}

impl GatedProvider {
    pub fn new(width: usize) -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
            inner: HashEmbeddingProvider::new(dim(width)),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GatedProvider {
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.embed(text).await
    }

    fn dimension(&self) -> VectorDimension {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Returns a vector with a NaN component for every text.
pub struct NanProvider {
    width: VectorDimension,
}

impl NanProvider {
    pub fn new(width: usize) -> Self {
        Self { width: dim(width) }
    }
}

#[async_trait]
impl EmbeddingProvider for NanProvider {
    async fn embed(&self, _text: &str) -> VectorResult<Vec<f32>> {
        let mut vector = vec![1.0; self.width.get()];
        vector[0] = f32::NAN;
        Ok(vector)
    }

    fn dimension(&self) -> VectorDimension {
        self.width
    }

    fn name(&self) -> &str {
        "nan"
    }
}
