//! Record storage.

mod memory;
mod record;

pub use memory::{PutOutcome, VectorStore};
pub use record::{DEFAULT_PREVIEW_CHARS, Metadata, NewRecord, Record, RecordSummary, preview};
