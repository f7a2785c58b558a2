//! PixelBuffer - packed storage for one image plane
//!
//! # Pixel layout
//!
//! - Image data is stored in 64-bit words
//! - Every row starts on a word boundary, so the stride is always a
//!   multiple of 8 bytes
//! - Pixels are packed MSB to LSB within each word; pixel 0 of a 1-bpp row
//!   is bit 63 of the row's first word
//! - 24-bpp pixels are stored as `0xRRGGBB` and may straddle two words
//! - 32-bpp pixels are stored as `0xRRGGBBAA` (red in the MSB)
//! - Bits past `width * depth` in the last word of a row ("pad bits") are
//!   kept at zero
//!
//! # Ownership model
//!
//! A `PixelBuffer` owns its storage exclusively. Operations that write into
//! a caller-supplied destination take it as `&mut PixelBuffer` for the
//! duration of the call and compute into scratch storage first, so a failed
//! operation never leaves a destination half-written.

mod access;
pub mod bits;
pub mod blit;
pub mod clip;
mod rop;

pub use blit::{CopyPath, CopyStrategy};
pub use clip::{ForegroundBounds, ScanForegroundBounds};
pub use rop::RopOp;

use crate::error::{Error, Result};
use crate::geom::Rect;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image; 1 is foreground (black)
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 24-bit packed RGB
    Bit24 = 24,
    /// 32-bit RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if `bits` is not 1, 8, 24, or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            24 => Ok(PixelDepth::Bit24),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::UnsupportedDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }

    /// Raw value of a white (background) pixel.
    ///
    /// Binary images use 0 for white; every other depth uses all bits set.
    pub fn white_value(self) -> u32 {
        match self {
            PixelDepth::Bit1 => 0,
            _ => self.max_value(),
        }
    }

    /// Raw value of a black pixel.
    pub fn black_value(self) -> u32 {
        match self {
            PixelDepth::Bit1 => 1,
            _ => 0,
        }
    }
}

/// Initial color for [`PixelBuffer::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitColor {
    /// Fill with the depth's black value
    Black,
    /// Fill with the depth's white value
    White,
}

/// Packed pixel storage for one image plane
///
/// # Examples
///
/// ```
/// use pixkit_core::{PixelBuffer, PixelDepth};
///
/// let buf = PixelBuffer::new(100, 20, PixelDepth::Bit1).unwrap();
/// assert_eq!(buf.stride(), 16); // 100 bits round up to two 64-bit words
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    depth: PixelDepth,
    /// 64-bit words per line
    wpl: u32,
    data: Vec<u64>,
}

impl PixelBuffer {
    /// Create a zero-initialized buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if width or height is 0 or the
    /// row size overflows, and [`Error::OutOfMemory`] if the storage
    /// cannot be allocated.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "buffer dimensions must be positive: {width}x{height}"
            )));
        }
        let wpl = Self::compute_wpl(width, depth)?;
        let len = (wpl as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::InvalidArgument(format!("buffer too large: {width}x{height}")))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory {
                operation: "buffer allocation",
            })?;
        data.resize(len, 0u64);

        Ok(Self {
            width,
            height,
            depth,
            wpl,
            data,
        })
    }

    /// Create a buffer filled with the white value of `depth`.
    pub fn new_white(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        let mut buf = Self::new(width, height, depth)?;
        buf.fill(InitColor::White);
        Ok(buf)
    }

    /// Wrap existing words as a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `data` does not hold exactly
    /// `words_per_line * height` words.
    pub fn from_words(width: u32, height: u32, depth: PixelDepth, data: Vec<u64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "buffer dimensions must be positive: {width}x{height}"
            )));
        }
        let wpl = Self::compute_wpl(width, depth)?;
        let expected = wpl as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "expected {expected} words for {width}x{height} at {} bpp, got {}",
                depth.bits(),
                data.len()
            )));
        }
        let mut buf = Self {
            width,
            height,
            depth,
            wpl,
            data,
        };
        buf.clear_pad_bits();
        Ok(buf)
    }

    /// Create a zeroed buffer with the same size and depth as `self`.
    pub fn create_template(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            depth: self.depth,
            wpl: self.wpl,
            data: vec![0u64; self.data.len()],
        }
    }

    /// Minimal word-aligned row size in bytes for `width` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the row size overflows.
    pub fn min_stride(width: u32, depth: PixelDepth) -> Result<usize> {
        Ok(Self::compute_wpl(width, depth)? as usize * 8)
    }

    fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        u32::try_from(bits_per_line.div_ceil(64)).map_err(|_| {
            Error::InvalidArgument(format!(
                "row too large: width={width} depth={}",
                depth.bits()
            ))
        })
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    /// Get the 64-bit words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.wpl
    }

    /// Get the row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.wpl as usize * 8
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Check whether two buffers have the same width and height.
    pub fn sizes_equal(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Get raw access to the words.
    #[inline]
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Get mutable access to the words.
    ///
    /// Callers must keep pad bits at zero.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u64] {
        &mut self.data
    }

    /// Words of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_words(&self, y: u32) -> &[u64] {
        let start = y as usize * self.wpl as usize;
        &self.data[start..start + self.wpl as usize]
    }

    /// Mutable words of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_words_mut(&mut self, y: u32) -> &mut [u64] {
        let start = y as usize * self.wpl as usize;
        let wpl = self.wpl as usize;
        &mut self.data[start..start + wpl]
    }

    /// Bit offset of pixel `(x, y)` from the start of the storage:
    /// `y * stride * 8 + x * depth`.
    #[inline]
    pub fn bit_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() * 8 + x as usize * self.depth.bits() as usize
    }

    /// Check that `rect` has a positive size and lies inside the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a non-positive width or height
    /// and [`Error::OutOfBounds`] if any part of the region is outside.
    pub fn check_region(&self, rect: Rect) -> Result<()> {
        if rect.w <= 0 || rect.h <= 0 {
            return Err(Error::InvalidArgument(format!(
                "region must have a positive size: {}x{}",
                rect.w, rect.h
            )));
        }
        let right = i64::from(rect.x) + i64::from(rect.w);
        let bottom = i64::from(rect.y) + i64::from(rect.h);
        if rect.x < 0 || rect.y < 0 || right > i64::from(self.width) || bottom > i64::from(self.height)
        {
            return Err(Error::out_of_bounds(
                rect.x,
                rect.y,
                rect.w,
                rect.h,
                self.width,
                self.height,
            ));
        }
        Ok(())
    }

    /// Fill every pixel with the black or white value of the depth.
    pub fn fill(&mut self, color: InitColor) {
        let val = match color {
            InitColor::Black => self.depth.black_value(),
            InitColor::White => self.depth.white_value(),
        };
        match val {
            0 => self.clear(),
            v if v == self.depth.max_value() => self.set_all(),
            v => self.fill_value(v),
        }
    }

    /// Clear all pixels to zero.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Set all pixel bits to one.
    pub fn set_all(&mut self) {
        self.data.fill(u64::MAX);
        self.clear_pad_bits();
    }

    /// Set every pixel to `val`.
    pub fn fill_value(&mut self, val: u32) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                self.set_pixel_unchecked(x, y, val);
            }
        }
    }

    /// Zero the bits past the last pixel of every row.
    pub fn clear_pad_bits(&mut self) {
        let used = (self.width as usize * self.depth.bits() as usize) % 64;
        if used == 0 {
            return;
        }
        let mask = u64::MAX << (64 - used);
        let wpl = self.wpl as usize;
        for row in self.data.chunks_exact_mut(wpl) {
            row[wpl - 1] &= mask;
        }
    }

    /// Replace the contents of `self` with `result`.
    ///
    /// Storage is reused when the geometry matches; otherwise `self` takes
    /// over the result's allocation.
    pub fn commit(&mut self, result: PixelBuffer) {
        if self.width == result.width && self.height == result.height && self.depth == result.depth
        {
            self.data.copy_from_slice(&result.data);
        } else {
            *self = result;
        }
    }
}
