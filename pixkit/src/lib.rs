//! pixkit - Packed pixel buffers and morphology for Rust
//!
//! # Overview
//!
//! - Packed 1/8/24/32-bpp pixel buffers with word-aligned rows
//! - Bit-accurate rectangle copy, crop and crop-to-foreground
//! - Structuring elements and binary/grayscale/color morphology
//! - A narrow boundary to an external numeric kernel for Otsu, Canny,
//!   color keying, depth conversion, line suppression and HOG
//!
//! # Example
//!
//! ```
//! use pixkit::{PixelBuffer, PixelDepth, StructuringElement};
//!
//! let mut pix = PixelBuffer::new(32, 32, PixelDepth::Bit1).unwrap();
//! pix.set_pixel(3, 3, 1).unwrap();
//! let sel = StructuringElement::square(3).unwrap();
//! let cleaned = pixkit::open(&pix, &sel, 1).unwrap();
//! assert_eq!(cleaned.count_foreground().unwrap(), 0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixkit_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixkit_core as core;
pub use pixkit_morph as morph;

pub use pixkit_morph::{
    Border, MorphEngine, MorphError, MorphOp, MorphResult, Shape, StructuringElement, close,
    despeckle, dilate, erode, open,
};
