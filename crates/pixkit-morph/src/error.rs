//! Error types for pixkit-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixkit_core::Error),

    /// Invalid structuring element or anchor
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
