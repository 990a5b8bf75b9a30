//! Error types for the embedding store and search engine
//!
//! Every failure surfaces to the caller with a machine-readable kind
//! (see [`ErrorKind`]) plus a human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for store, search and embedding operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorStoreError {
    /// Bad top_k, threshold, limit or vector contents
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Unknown document id
    #[error("Document '{id}' not found. Store it first or check the id.")]
    NotFound { id: String },

    /// Vector width does not match the engine's configured dimension
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors use the same embedding model"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding provider unreachable, timed out, or errored
    #[error("Embedding provider '{provider}' failed: {reason}")]
    ProviderFailure { provider: String, reason: String },

    /// Unexpected invariant violation
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    DimensionMismatch,
    ProviderFailure,
    Internal,
}

impl VectorStoreError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn provider_failure(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderFailure {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::ProviderFailure { .. } => ErrorKind::ProviderFailure,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::ProviderFailure { .. } => "PROVIDER_FAILURE",
            Self::Internal { .. } => "INTERNAL",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidArgument { .. } => vec![
                "top_k must be a positive integer",
                "threshold must lie within [-1.0, 1.0]",
            ],
            Self::DimensionMismatch { .. } => vec![
                "Omit the vector to let the store embed the text itself",
                "Check embedding.dimension in .vecsearch/settings.toml",
            ],
            Self::ProviderFailure { .. } => vec![
                "Retry the request; the store was left unchanged",
                "Raise embedding.timeout_ms or switch embedding.provider to \"hash\"",
            ],
            Self::Internal { .. } => vec!["Restart the process to rebuild the in-memory store"],
            Self::NotFound { .. } => vec![],
        }
    }

    /// Whether the same request could succeed on retry without changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderFailure { .. })
    }
}

/// Result type alias for store and search operations
pub type VectorResult<T> = Result<T, VectorStoreError>;
