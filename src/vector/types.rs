//! Type-safe wrappers for vector widths.
//!
//! Every vector stored or queried shares one fixed dimensionality. The
//! [`VectorDimension`] newtype carries that width and validates vectors
//! against it, so width checks never drift between call sites.

use crate::error::{VectorResult, VectorStoreError};
use serde::{Deserialize, Serialize};

/// Standard embedding width (all-MiniLM-L6-v2 and the hash fallback).
pub const VECTOR_DIMENSION_384: usize = 384;

/// Type-safe wrapper for vector dimensions.
///
/// A dimension is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> VectorResult<Self> {
        if dim == 0 {
            return Err(VectorStoreError::invalid_argument(
                "vector dimension cannot be zero",
            ));
        }
        Ok(Self(dim))
    }

    /// Creates a standard 384-dimensional vector dimension.
    #[must_use]
    pub const fn dimension_384() -> Self {
        Self(VECTOR_DIMENSION_384)
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> VectorResult<()> {
        if vector.len() != self.0 {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Validates width and rejects NaN or infinite components.
    ///
    /// Non-finite values would make similarity scores unordered.
    pub fn validate_finite(&self, vector: &[f32]) -> VectorResult<()> {
        self.validate_vector(vector)?;
        if let Some((i, v)) = vector.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(VectorStoreError::invalid_argument(format!(
                "vector component {i} is not finite ({v})"
            )));
        }
        Ok(())
    }
}

impl Default for VectorDimension {
    fn default() -> Self {
        Self::dimension_384()
    }
}

impl TryFrom<usize> for VectorDimension {
    type Error = VectorStoreError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VectorDimension> for usize {
    fn from(dim: VectorDimension) -> usize {
        dim.0
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
