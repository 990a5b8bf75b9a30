//! In-memory embedding store with exact cosine-similarity search.
//!
//! Records (id, text, vector, metadata) live in a lock-protected,
//! insertion-ordered [`VectorStore`]. Text without a vector is embedded by a
//! pluggable [`EmbeddingProvider`]. [`SearchEngine`] scores every record
//! against the query and returns a stable top-k ranking.

pub mod config;
pub mod embedding;
pub mod error;
pub mod logging;
pub mod search;
pub mod service;
pub mod store;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use embedding::{EmbeddingProvider, HashEmbeddingProvider, TimeoutProvider, create_provider};
pub use error::{ErrorKind, VectorResult, VectorStoreError};
pub use search::{SearchEngine, SearchHit, SearchQuery};
pub use service::{Request, Response, VectorService};
pub use store::{Metadata, NewRecord, Record, RecordSummary, VectorStore};
pub use vector::{VectorDimension, cosine_similarity};
