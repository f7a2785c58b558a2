//! pixkit core - packed pixel buffers
//!
//! This crate provides the data structures shared by the pixkit crates:
//!
//! - [`PixelBuffer`] - packed 1/8/24/32-bpp storage with word-aligned rows
//! - [`Image`] - a buffer plus coordinate transform and resolution
//! - [`Point`] / [`Size`] / [`Rect`] / [`Transform`] - geometry values
//! - [`kernel`] - the boundary to the external numeric kernel
//!
//! Rectangle transfer (`copy_in_place`, `paste`, `crop`,
//! `crop_black_area`) lives on [`PixelBuffer`] and [`Image`].

pub mod buffer;
pub mod error;
pub mod geom;
pub mod image;
pub mod kernel;

pub use buffer::{
    CopyPath, CopyStrategy, ForegroundBounds, InitColor, PixelBuffer, PixelDepth, RopOp,
    ScanForegroundBounds,
};
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size, Transform};
pub use image::Image;
pub use kernel::{
    CannyParams, ColorKeyParams, HogParams, LineSuppressParams, NumericKernel, RawImage,
    RawImageMut,
};

/// Color channel helpers for 24 and 32-bit pixels.
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB);
/// 24-bit pixels as `0xRRGGBB`.
pub mod color {
    /// Shift amounts for extracting 32-bit color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Shift amounts of every 32-bit channel, red first
    pub const CHANNEL_SHIFTS: [u32; 4] = [RED_SHIFT, GREEN_SHIFT, BLUE_SHIFT, ALPHA_SHIFT];

    #[inline]
    pub fn red(pixel: u32) -> u8 {
        (pixel >> RED_SHIFT) as u8
    }

    #[inline]
    pub fn green(pixel: u32) -> u8 {
        (pixel >> GREEN_SHIFT) as u8
    }

    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        (pixel >> BLUE_SHIFT) as u8
    }

    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        pixel as u8
    }

    /// Compose a 32-bit `0xRRGGBBAA` pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        (u32::from(r) << RED_SHIFT)
            | (u32::from(g) << GREEN_SHIFT)
            | (u32::from(b) << BLUE_SHIFT)
            | u32::from(a)
    }

    /// Compose a 24-bit `0xRRGGBB` pixel.
    #[inline]
    pub fn compose_rgb24(r: u8, g: u8, b: u8) -> u32 {
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }
}
