//! Error types for the test helpers

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// A fixture description could not be turned into a buffer
    #[error("invalid fixture: {message}")]
    Fixture { message: String },

    /// Buffer construction failed
    #[error("core error: {0}")]
    Core(#[from] pixkit_core::Error),
}

/// Result type for test helper operations
pub type TestResult<T> = Result<T, TestError>;
