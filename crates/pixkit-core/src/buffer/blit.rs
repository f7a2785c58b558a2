//! Rectangle transfer between buffers
//!
//! Every transfer is validated against both buffers before any pixel is
//! written. Full-width transfers between buffers with identical minimal
//! strides collapse into a single linear word copy; everything else is
//! copied one row at a time with the bit-level primitive, which handles
//! arbitrary (non byte-aligned) offsets.

use super::PixelBuffer;
use super::bits::{copy_bits, copy_bits_within};
use crate::error::{Error, Result};
use crate::geom::{Point, Rect};

/// How a rectangle transfer should be carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyStrategy {
    /// Use the linear fast path whenever the layout allows it
    #[default]
    Auto,
    /// Always copy row by row at bit granularity
    RowByRow,
}

/// Which path a transfer actually took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    /// One contiguous word-range copy
    Linear,
    /// One bit-level copy per row
    Rows,
}

impl PixelBuffer {
    /// Copy the `dst.w x dst.h` region of `source` starting at `src` into
    /// `dst` of this buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthMismatch`] if the depths differ,
    /// [`Error::InvalidArgument`] for a non-positive size and
    /// [`Error::OutOfBounds`] if either region leaves its buffer.
    pub fn copy_in_place(&mut self, dst: Rect, source: &PixelBuffer, src: Point) -> Result<CopyPath> {
        self.copy_in_place_with(dst, source, src, CopyStrategy::Auto)
    }

    /// [`copy_in_place`](Self::copy_in_place) with an explicit strategy.
    pub fn copy_in_place_with(
        &mut self,
        dst: Rect,
        source: &PixelBuffer,
        src: Point,
        strategy: CopyStrategy,
    ) -> Result<CopyPath> {
        if self.depth != source.depth {
            return Err(Error::DepthMismatch {
                expected: self.depth.bits(),
                actual: source.depth.bits(),
            });
        }
        self.check_region(dst)?;
        source.check_region(Rect::new(src.x, src.y, dst.w, dst.h))?;

        let path = select_path(self, dst, source, src, strategy)?;
        log::trace!(
            "copy {}x{} from ({}, {}) to ({}, {}) at {} bpp: {:?}",
            dst.w,
            dst.h,
            src.x,
            src.y,
            dst.x,
            dst.y,
            self.depth.bits(),
            path
        );

        match path {
            CopyPath::Linear => {
                let wpl = self.wpl as usize;
                let d = dst.y as usize * wpl;
                let s = src.y as usize * wpl;
                let n = dst.h as usize * wpl;
                self.data[d..d + n].copy_from_slice(&source.data[s..s + n]);
            }
            CopyPath::Rows => {
                let count = dst.w as usize * self.depth.bits() as usize;
                for row in 0..dst.h as u32 {
                    let dst_bit = self.bit_offset(dst.x as u32, dst.y as u32 + row);
                    let src_bit = source.bit_offset(src.x as u32, src.y as u32 + row);
                    copy_bits(&mut self.data, dst_bit, &source.data, src_bit, count);
                }
            }
        }
        Ok(path)
    }

    /// Paste the whole of `source` with its top-left corner at `at`.
    pub fn paste(&mut self, source: &PixelBuffer, at: Point) -> Result<CopyPath> {
        let dst = Rect::new(at.x, at.y, source.width as i32, source.height as i32);
        self.copy_in_place(dst, source, Point::new(0, 0))
    }

    /// Copy a region of this buffer onto another region of itself.
    ///
    /// Overlapping regions are handled as if the source were read in full
    /// before the destination is written.
    ///
    /// # Errors
    ///
    /// Same conditions as [`copy_in_place`](Self::copy_in_place).
    pub fn copy_within(&mut self, dst: Rect, src: Point, strategy: CopyStrategy) -> Result<CopyPath> {
        self.check_region(dst)?;
        self.check_region(Rect::new(src.x, src.y, dst.w, dst.h))?;

        let full_width = dst.w as u32 == self.width && dst.x == 0 && src.x == 0;
        let path = if strategy == CopyStrategy::Auto && full_width {
            CopyPath::Linear
        } else {
            CopyPath::Rows
        };
        log::trace!("copy_within {:?} from {:?}: {:?}", dst, src, path);

        match path {
            CopyPath::Linear => {
                let wpl = self.wpl as usize;
                let s = src.y as usize * wpl;
                let n = dst.h as usize * wpl;
                self.data.copy_within(s..s + n, dst.y as usize * wpl);
            }
            CopyPath::Rows => {
                let count = dst.w as usize * self.depth.bits() as usize;
                let h = dst.h as u32;
                // Visit rows bottom-up when the destination lies below the source
                let bottom_up = dst.y > src.y;
                for i in 0..h {
                    let row = if bottom_up { h - 1 - i } else { i };
                    let dst_bit = self.bit_offset(dst.x as u32, dst.y as u32 + row);
                    let src_bit = self.bit_offset(src.x as u32, src.y as u32 + row);
                    copy_bits_within(&mut self.data, dst_bit, src_bit, count);
                }
            }
        }
        Ok(path)
    }
}

/// Decide between the linear and per-row paths.
///
/// The linear path requires both strides to equal the minimal word-aligned
/// stride of the copied width, the copy to span full rows of both buffers,
/// and both x offsets to be zero.
fn select_path(
    dst_buf: &PixelBuffer,
    dst: Rect,
    src_buf: &PixelBuffer,
    src: Point,
    strategy: CopyStrategy,
) -> Result<CopyPath> {
    if strategy == CopyStrategy::RowByRow {
        return Ok(CopyPath::Rows);
    }
    let row_stride = PixelBuffer::min_stride(dst.w as u32, dst_buf.depth)?;
    let linear = dst_buf.stride() == row_stride
        && src_buf.stride() == row_stride
        && dst.w as u32 == dst_buf.width
        && dst.w as u32 == src_buf.width
        && dst.x == 0
        && src.x == 0;
    Ok(if linear { CopyPath::Linear } else { CopyPath::Rows })
}
