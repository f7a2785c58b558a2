//! Rectangle clipping operations
//!
//! Cropping a validated region into a new buffer, and cropping to the
//! foreground ("black") content with a margin. Locating the foreground is
//! delegated to a [`ForegroundBounds`] collaborator.

use super::{PixelBuffer, PixelDepth};
use crate::error::{Error, Result};
use crate::geom::{Point, Rect};

/// Computes the tight bounding box of non-background pixels.
///
/// Implementations return an empty rectangle when the buffer has no
/// foreground.
pub trait ForegroundBounds {
    fn foreground_bounds(&self, buffer: &PixelBuffer) -> Rect;
}

impl<F> ForegroundBounds for F
where
    F: Fn(&PixelBuffer) -> Rect,
{
    fn foreground_bounds(&self, buffer: &PixelBuffer) -> Rect {
        self(buffer)
    }
}

/// Scanning [`ForegroundBounds`] implementation.
///
/// A pixel is foreground when it is set (1 bpp), darker than the threshold
/// (8 bpp), or has a mean RGB value darker than the threshold (24 and
/// 32 bpp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanForegroundBounds {
    threshold: u32,
}

impl Default for ScanForegroundBounds {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl ScanForegroundBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `threshold` as the darkness cutoff for 8, 24 and 32 bpp.
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold: u32::from(threshold),
        }
    }

    fn is_foreground(&self, buffer: &PixelBuffer, x: u32, y: u32) -> bool {
        let v = buffer.get_pixel_unchecked(x, y);
        match buffer.depth() {
            PixelDepth::Bit1 => v != 0,
            PixelDepth::Bit8 => v < self.threshold,
            PixelDepth::Bit24 => ((v >> 16) + ((v >> 8) & 0xff) + (v & 0xff)) < 3 * self.threshold,
            PixelDepth::Bit32 => {
                ((v >> 24) + ((v >> 16) & 0xff) + ((v >> 8) & 0xff)) < 3 * self.threshold
            }
        }
    }

    fn row_has_foreground(&self, buffer: &PixelBuffer, y: u32) -> bool {
        if buffer.depth() == PixelDepth::Bit1 {
            return buffer.row_words(y).iter().any(|&w| w != 0);
        }
        (0..buffer.width()).any(|x| self.is_foreground(buffer, x, y))
    }
}

impl ForegroundBounds for ScanForegroundBounds {
    fn foreground_bounds(&self, buffer: &PixelBuffer) -> Rect {
        let h = buffer.height();
        let Some(top) = (0..h).find(|&y| self.row_has_foreground(buffer, y)) else {
            return Rect::empty();
        };
        let bottom = (0..h)
            .rev()
            .find(|&y| self.row_has_foreground(buffer, y))
            .unwrap_or(top);

        let mut left = buffer.width();
        let mut right = 0;
        for y in top..=bottom {
            for x in 0..buffer.width() {
                if self.is_foreground(buffer, x, y) {
                    left = left.min(x);
                    right = right.max(x);
                }
            }
        }
        Rect::new(
            left as i32,
            top as i32,
            (right - left + 1) as i32,
            (bottom - top + 1) as i32,
        )
    }
}

impl PixelBuffer {
    /// Extract a rectangular sub-region into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) for a
    /// non-positive size and [`Error::OutOfBounds`](crate::Error::OutOfBounds)
    /// if the region is not fully inside the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixkit_core::{PixelBuffer, PixelDepth, Rect};
    ///
    /// let buf = PixelBuffer::new(100, 80, PixelDepth::Bit8).unwrap();
    /// let cropped = buf.crop(Rect::new(10, 20, 50, 40)).unwrap();
    /// assert_eq!((cropped.width(), cropped.height()), (50, 40));
    /// assert!(buf.crop(Rect::new(80, 60, 50, 50)).is_err());
    /// ```
    pub fn crop(&self, rect: Rect) -> Result<PixelBuffer> {
        self.check_region(rect)?;
        let mut out = PixelBuffer::new(rect.w as u32, rect.h as u32, self.depth)?;
        out.copy_in_place(out.bounds(), self, rect.origin())?;
        Ok(out)
    }

    /// Crop to the foreground bounding box grown by `dx` on the left and
    /// right and `dy` on the top and bottom.
    ///
    /// The output always has the full expanded size. Parts of the expanded
    /// box outside this buffer are background: for depths above 1 bpp they
    /// are explicitly filled with white, for 1 bpp the zero-initialized
    /// storage already is white.
    ///
    /// When there is no foreground, the result is a
    /// `max(1, 2*dx) x max(1, 2*dy)` white buffer, nothing is copied, and
    /// the returned region is `None`. Otherwise the returned region is the
    /// expanded box in this buffer's coordinates (it may start at negative
    /// coordinates).
    pub fn crop_black_area(
        &self,
        bounds: &impl ForegroundBounds,
        dx: u32,
        dy: u32,
    ) -> Result<(PixelBuffer, Option<Rect>)> {
        let fg = bounds
            .foreground_bounds(self)
            .intersect(&self.bounds())
            .filter(|r| !r.is_empty());

        let Some(fg) = fg else {
            let w = margin_extent(dx)?;
            let h = margin_extent(dy)?;
            log::debug!("crop_black_area: no foreground, returning {w}x{h} background");
            return Ok((PixelBuffer::new_white(w, h, self.depth)?, None));
        };

        let expanded = fg.expand(dx, dy)?;
        let mut out = PixelBuffer::new(expanded.w as u32, expanded.h as u32, self.depth)?;
        if self.depth != PixelDepth::Bit1 {
            out.fill(super::InitColor::White);
        }

        // The expanded box always contains `fg`, so the intersection is non-empty
        let inter = expanded.intersect(&self.bounds()).unwrap_or(fg);
        let dst = Rect::new(inter.x - expanded.x, inter.y - expanded.y, inter.w, inter.h);
        out.copy_in_place(dst, self, Point::new(inter.x, inter.y))?;
        Ok((out, Some(expanded)))
    }
}

/// `max(1, 2 * margin)`
fn margin_extent(margin: u32) -> Result<u32> {
    margin
        .checked_mul(2)
        .map(|v| v.max(1))
        .ok_or_else(|| Error::InvalidArgument(format!("margin {margin} too large")))
}
