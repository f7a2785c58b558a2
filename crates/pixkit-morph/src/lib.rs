//! pixkit-morph - Morphological operations on pixel buffers
//!
//! This crate provides:
//!
//! - Structuring elements ([`StructuringElement`]) described by shape, size
//!   and anchor, yielding their neighbor offsets lazily
//! - Binary morphology: erosion, dilation, opening, closing, despeckle,
//!   computed on whole 64-bit words
//! - Grayscale (8 bpp) and color (32 bpp, per channel) min/max morphology
//! - [`MorphEngine`], which carries the border policy and anchor override
//!   and exposes new-buffer, into-destination and in-place call shapes

mod binary;
pub mod engine;
mod error;
mod gray;
pub mod sel;

pub use engine::{Border, MorphEngine, MorphOp, close, despeckle, dilate, erode, open};
pub use error::{MorphError, MorphResult};
pub use sel::{Elements, Shape, StructuringElement};
