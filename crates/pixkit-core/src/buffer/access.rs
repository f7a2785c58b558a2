//! Pixel access functions
//!
//! Getting and setting individual pixels at any supported depth. All
//! accessors go through the bit offset `y * stride * 8 + x * depth`.

use super::bits::{read_bits, write_bits};
use super::{PixelBuffer, PixelDepth};
use crate::color::{compose_rgb24, compose_rgba};
use crate::error::{Error, Result};

impl PixelBuffer {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// May panic (or read a neighboring pixel) if `x >= width` or
    /// `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let bit = self.bit_offset(x, y);
        read_bits(&self.data, bit, self.depth.bits()) as u32
    }

    /// Set a pixel value at (x, y).
    ///
    /// Values wider than the depth are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(
                x as i32,
                y as i32,
                1,
                1,
                self.width,
                self.height,
            ));
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let bit = self.bit_offset(x, y);
        let n = self.depth.bits();
        write_bits(&mut self.data, bit, n, u64::from(val));
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 24 and 32-bit buffers.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let v = self.get_pixel(x, y)?;
        match self.depth {
            PixelDepth::Bit24 => Some(((v >> 16) as u8, (v >> 8) as u8, v as u8)),
            PixelDepth::Bit32 => Some(((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8)),
            _ => None,
        }
    }

    /// Set an RGB pixel at (x, y). 32-bit pixels get alpha 255.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 1 and 8-bit buffers and
    /// [`Error::OutOfBounds`] for coordinates outside the buffer.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        let val = match self.depth {
            PixelDepth::Bit24 => compose_rgb24(r, g, b),
            PixelDepth::Bit32 => compose_rgba(r, g, b, 255),
            d => return Err(Error::UnsupportedDepth(d.bits())),
        };
        self.set_pixel(x, y, val)
    }
}
