//! Error types for pixkit-core
//!
//! Every fallible operation in the core crate returns [`Result<T>`].
//! Errors are raised where they are detected and propagate to the
//! immediate caller; nothing in this crate retries or recovers locally.

use thiserror::Error;

/// pixkit-core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument is missing or has a non-positive size
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested rectangle exceeds the buffer extents
    #[error(
        "region {x},{y} {w}x{h} is out of bounds for a {width}x{height} buffer"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        w: i64,
        h: i64,
        width: u32,
        height: u32,
    },

    /// The operation does not support this number of bits per pixel
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Two buffers involved in one transfer have different depths
    #[error("pixel depth mismatch: expected {expected} bpp, got {actual} bpp")]
    DepthMismatch { expected: u32, actual: u32 },

    /// Two buffers involved in one operation have different sizes
    #[error("size mismatch: {}x{} vs {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The numeric kernel reported a non-zero status
    #[error("{operation} failed with status {code}: {reason}")]
    OperationFailed {
        operation: &'static str,
        code: i32,
        reason: &'static str,
    },

    /// Pixel storage could not be allocated
    #[error("out of memory during {operation}")]
    OutOfMemory { operation: &'static str },
}

impl Error {
    /// Build an [`Error::OutOfBounds`] for the region `(x, y, w, h)`.
    pub(crate) fn out_of_bounds(x: i32, y: i32, w: i32, h: i32, width: u32, height: u32) -> Self {
        Error::OutOfBounds {
            x: x.into(),
            y: y.into(),
            w: w.into(),
            h: h.into(),
            width,
            height,
        }
    }
}

/// Result type alias for pixkit-core operations
pub type Result<T> = std::result::Result<T, Error>;
