//! Exact cosine-similarity search over the store.
//!
//! Every query is an exhaustive scan: embed the query text (no lock held),
//! take one snapshot of the store, score each record, drop those below the
//! threshold and stable-sort the rest. Ties keep insertion order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::embedding::embed_checked;
use crate::error::{VectorResult, VectorStoreError};
use crate::store::{Metadata, Record, VectorStore};
use crate::vector::cosine_similarity;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_THRESHOLD: f32 = 0.0;

/// A validated-on-use search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub top_k: usize,
    /// Minimum similarity, inclusive
    pub threshold: f32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// `top_k` must be positive and `threshold` must lie within `[-1, 1]`.
    pub fn validate(&self) -> VectorResult<()> {
        if self.top_k == 0 {
            return Err(VectorStoreError::invalid_argument(
                "top_k must be a positive integer, got 0",
            ));
        }
        // NaN fails `contains`
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(VectorStoreError::invalid_argument(format!(
                "threshold must lie within [-1.0, 1.0], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
    pub similarity: f32,
    pub metadata: Metadata,
}

impl SearchHit {
    fn from_record(record: &Record, similarity: f32) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            similarity,
            metadata: record.metadata.clone(),
        }
    }
}

/// Score, filter and rank `records` against `query_vector`.
///
/// `records` must be in insertion order for ties to resolve correctly.
pub fn rank(
    records: &[Arc<Record>],
    query_vector: &[f32],
    top_k: usize,
    threshold: f32,
) -> Vec<SearchHit> {
    let mut scored: Vec<(f32, &Record)> = records
        .iter()
        .map(|record| (cosine_similarity(query_vector, &record.vector), record.as_ref()))
        .filter(|(similarity, _)| *similarity >= threshold)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(similarity, record)| SearchHit::from_record(record, similarity))
        .collect()
}

/// Read-only search front end over a shared store.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    store: Arc<VectorStore>,
}

impl SearchEngine {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Embed the query text and rank the store against it.
    ///
    /// Validation happens before the provider is called. A provider failure
    /// aborts the whole query.
    pub async fn search(&self, query: &SearchQuery) -> VectorResult<Vec<SearchHit>> {
        query.validate()?;
        let query_vector = embed_checked(
            self.store.provider().as_ref(),
            &query.text,
            self.store.dimension(),
        )
        .await?;
        self.scan(&query_vector, query.top_k, query.threshold)
    }

    /// Rank the store against a caller-supplied query vector.
    pub fn search_by_vector(
        &self,
        query_vector: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> VectorResult<Vec<SearchHit>> {
        SearchQuery {
            text: String::new(),
            top_k,
            threshold,
        }
        .validate()?;
        self.store.dimension().validate_finite(query_vector)?;
        self.scan(query_vector, top_k, threshold)
    }

    fn scan(&self, query_vector: &[f32], top_k: usize, threshold: f32) -> VectorResult<Vec<SearchHit>> {
        let start = Instant::now();
        let snapshot = self.store.snapshot();
        let hits = rank(&snapshot, query_vector, top_k, threshold);

        tracing::debug!(
            scanned = snapshot.len(),
            returned = hits.len(),
            top_k,
            threshold,
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );

        Ok(hits)
    }
}
