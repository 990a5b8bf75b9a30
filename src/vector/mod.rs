//! Vector primitives shared by the store and the search engine.
//!
//! Holds the dimension newtype and the similarity function; nothing in
//! here knows about records or providers.

mod similarity;
mod types;

pub use similarity::{cosine_similarity, l2_norm};
pub use types::{VECTOR_DIMENSION_384, VectorDimension};
