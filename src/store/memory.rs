//! Lock-protected in-memory record store.
//!
//! Records live behind `Arc` so readers can take a snapshot under a brief
//! read lock and scan it with no lock held. A writer replaces the `Arc`,
//! never mutates through it, so a snapshot can never observe a torn record.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use super::record::{DEFAULT_PREVIEW_CHARS, NewRecord, Record, RecordSummary};
use crate::embedding::{EmbeddingProvider, embed_checked};
use crate::error::{VectorResult, VectorStoreError};
use crate::vector::VectorDimension;

/// Outcome of a successful [`VectorStore::put`].
#[derive(Debug, Clone)]
pub struct PutOutcome {
    pub record: Arc<Record>,
    /// An existing record with the same id was overwritten.
    pub replaced: bool,
}

#[derive(Debug, Default)]
struct StoreInner {
    /// Records keyed by first-insertion sequence number
    records: BTreeMap<u64, Arc<Record>>,
    /// id -> sequence number
    positions: HashMap<String, u64>,
    next_seq: u64,
}

impl StoreInner {
    fn insert(&mut self, record: Arc<Record>) -> bool {
        if let Some(&seq) = self.positions.get(&record.id) {
            self.records.insert(seq, record);
            return true;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.positions.insert(record.id.clone(), seq);
        self.records.insert(seq, record);
        false
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.positions.remove(id) {
            Some(seq) => self.records.remove(&seq).is_some(),
            None => false,
        }
    }
}

/// Insertion-ordered store keyed by document id.
///
/// Overwriting an id keeps its original position. Deleting and re-inserting
/// moves it to the end.
pub struct VectorStore {
    dimension: VectorDimension,
    provider: Arc<dyn EmbeddingProvider>,
    preview_chars: usize,
    inner: RwLock<StoreInner>,
}

impl VectorStore {
    /// Create an empty store whose width is the provider's dimension.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            dimension: provider.dimension(),
            provider,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Characters kept in [`list`](Self::list) previews.
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Insert or overwrite a record.
    ///
    /// A supplied vector is validated before anything else happens.
    /// Otherwise the text is embedded with no lock held. Any failure leaves
    /// the store unchanged.
    pub async fn put(&self, new: NewRecord) -> VectorResult<PutOutcome> {
        let start = Instant::now();

        if new.id.is_empty() {
            return Err(VectorStoreError::invalid_argument("id must not be empty"));
        }

        let vector = match new.vector {
            Some(vector) => {
                self.dimension.validate_finite(&vector)?;
                vector
            }
            None => embed_checked(self.provider.as_ref(), &new.text, self.dimension).await?,
        };

        let record = Arc::new(Record {
            id: new.id,
            text: new.text,
            vector,
            metadata: new.metadata,
        });

        let replaced = self.inner.write().insert(Arc::clone(&record));

        tracing::debug!(
            id = %record.id,
            replaced,
            elapsed_us = start.elapsed().as_micros() as u64,
            "stored record"
        );

        Ok(PutOutcome { record, replaced })
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> VectorResult<Arc<Record>> {
        let inner = self.inner.read();
        inner
            .positions
            .get(id)
            .and_then(|seq| inner.records.get(seq))
            .cloned()
            .ok_or_else(|| VectorStoreError::not_found(id))
    }

    /// Remove a record. Returns `false` when the id was unknown.
    pub fn delete(&self, id: &str) -> bool {
        let deleted = self.inner.write().remove(id);
        tracing::debug!(id, deleted, "delete record");
        deleted
    }

    /// Up to `limit` summaries in insertion order.
    pub fn list(&self, limit: usize) -> Vec<RecordSummary> {
        let inner = self.inner.read();
        inner
            .records
            .values()
            .take(limit)
            .map(|record| RecordSummary::from_record(record, self.preview_chars))
            .collect()
    }

    /// Consistent point-in-time view of every record in insertion order.
    ///
    /// Writes that land after this returns are not visible in the snapshot.
    pub fn snapshot(&self) -> Vec<Arc<Record>> {
        self.inner.read().records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().positions.contains_key(id)
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("dimension", &self.dimension)
            .field("provider", &self.provider.name())
            .field("records", &self.len())
            .finish()
    }
}
