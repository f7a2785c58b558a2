//! Raster operations
//!
//! Word-level bitwise combination of two buffers, inversion, rectangle
//! fills, and comparison helpers.

use super::{PixelBuffer, PixelDepth};
use crate::error::{Error, Result};
use crate::geom::Rect;

/// Raster operation combining a source into a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// Source AND destination
    And,
    /// Source OR destination
    Or,
    /// Source XOR destination
    Xor,
    /// (NOT source) AND destination
    Subtract,
}

impl PixelBuffer {
    /// Combine `other` into `self` word by word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthMismatch`] or [`Error::SizeMismatch`] if the
    /// buffers are not compatible.
    pub fn rop_in_place(&mut self, other: &PixelBuffer, op: RopOp) -> Result<()> {
        self.check_compatible(other)?;
        let pairs = self.data.iter_mut().zip(other.data.iter());
        match op {
            RopOp::And => pairs.for_each(|(d, s)| *d &= *s),
            RopOp::Or => pairs.for_each(|(d, s)| *d |= *s),
            RopOp::Xor => pairs.for_each(|(d, s)| *d ^= *s),
            RopOp::Subtract => pairs.for_each(|(d, s)| *d &= !*s),
        }
        Ok(())
    }

    /// Bitwise AND with another buffer, in place.
    pub fn and_in_place(&mut self, other: &PixelBuffer) -> Result<()> {
        self.rop_in_place(other, RopOp::And)
    }

    /// Bitwise OR with another buffer, in place.
    pub fn or_in_place(&mut self, other: &PixelBuffer) -> Result<()> {
        self.rop_in_place(other, RopOp::Or)
    }

    /// Bitwise XOR with another buffer, in place.
    pub fn xor_in_place(&mut self, other: &PixelBuffer) -> Result<()> {
        self.rop_in_place(other, RopOp::Xor)
    }

    /// Invert all pixels.
    ///
    /// For 32bpp buffers only the RGB channels are inverted; the alpha
    /// byte is preserved.
    pub fn invert(&self) -> PixelBuffer {
        let mut out = self.clone();
        out.invert_in_place();
        out
    }

    /// Invert all pixels in place.
    pub fn invert_in_place(&mut self) {
        let mask = match self.depth {
            PixelDepth::Bit32 => 0xFFFF_FF00_FFFF_FF00u64,
            _ => u64::MAX,
        };
        for word in self.data.iter_mut() {
            *word ^= mask;
        }
        self.clear_pad_bits();
    }

    /// Set every pixel of `rect` to `val`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] or [`Error::OutOfBounds`] if the
    /// region is empty or not inside the buffer.
    pub fn fill_rect(&mut self, rect: Rect, val: u32) -> Result<()> {
        self.check_region(rect)?;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_pixel_unchecked(x as u32, y as u32, val);
            }
        }
        Ok(())
    }

    /// Count the set pixels of a 1-bpp buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for any depth other than 1.
    pub fn count_foreground(&self) -> Result<u64> {
        if self.depth != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth.bits()));
        }
        Ok(self.data.iter().map(|w| u64::from(w.count_ones())).sum())
    }

    /// Check whether two buffers have the same size, depth and pixels.
    pub fn equals(&self, other: &PixelBuffer) -> bool {
        self == other
    }

    pub(crate) fn check_compatible(&self, other: &PixelBuffer) -> Result<()> {
        if self.depth != other.depth {
            return Err(Error::DepthMismatch {
                expected: self.depth.bits(),
                actual: other.depth.bits(),
            });
        }
        if !self.sizes_equal(other) {
            return Err(Error::SizeMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_with(pixels: &[(u32, u32)]) -> PixelBuffer {
        let mut buf = PixelBuffer::new(70, 3, PixelDepth::Bit1).unwrap();
        for &(x, y) in pixels {
            buf.set_pixel(x, y, 1).unwrap();
        }
        buf
    }

    #[test]
    fn test_and_or_xor() {
        let a = binary_with(&[(0, 0), (65, 1), (3, 2)]);
        let b = binary_with(&[(0, 0), (3, 2), (69, 2)]);

        let mut and = a.clone();
        and.and_in_place(&b).unwrap();
        assert_eq!(and.count_foreground().unwrap(), 2);

        let mut or = a.clone();
        or.or_in_place(&b).unwrap();
        assert_eq!(or.count_foreground().unwrap(), 4);

        let mut xor = a.clone();
        xor.xor_in_place(&b).unwrap();
        assert_eq!(xor.count_foreground().unwrap(), 2);
        assert_eq!(xor.get_pixel(65, 1), Some(1));
        assert_eq!(xor.get_pixel(69, 2), Some(1));
    }

    #[test]
    fn test_rop_rejects_mismatch() {
        let mut a = PixelBuffer::new(8, 8, PixelDepth::Bit1).unwrap();
        let b = PixelBuffer::new(8, 8, PixelDepth::Bit8).unwrap();
        let c = PixelBuffer::new(9, 8, PixelDepth::Bit1).unwrap();
        assert_eq!(
            a.and_in_place(&b),
            Err(Error::DepthMismatch {
                expected: 1,
                actual: 8
            })
        );
        assert!(matches!(a.or_in_place(&c), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_invert_keeps_pad_bits_and_alpha() {
        let buf = PixelBuffer::new(70, 2, PixelDepth::Bit1).unwrap();
        let inv = buf.invert();
        assert_eq!(inv.count_foreground().unwrap(), 140);

        let mut rgba = PixelBuffer::new(3, 1, PixelDepth::Bit32).unwrap();
        rgba.set_pixel(1, 0, 0x1020_3040).unwrap();
        let inv = rgba.invert();
        assert_eq!(inv.get_pixel(1, 0), Some(0xEFDF_CF40));
        assert_eq!(inv.get_pixel(2, 0), Some(0xFFFF_FF00));
    }

    #[test]
    fn test_fill_rect() {
        let mut buf = PixelBuffer::new(10, 10, PixelDepth::Bit8).unwrap();
        buf.fill_rect(Rect::new(2, 3, 4, 2), 77).unwrap();
        assert_eq!(buf.get_pixel(2, 3), Some(77));
        assert_eq!(buf.get_pixel(5, 4), Some(77));
        assert_eq!(buf.get_pixel(6, 4), Some(0));
        assert!(buf.fill_rect(Rect::new(8, 8, 4, 4), 1).is_err());
    }

    #[test]
    fn test_count_foreground_requires_binary() {
        let buf = PixelBuffer::new(4, 4, PixelDepth::Bit8).unwrap();
        assert_eq!(buf.count_foreground(), Err(Error::UnsupportedDepth(8)));
    }
}
