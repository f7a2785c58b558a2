//! Boundary to the external numeric kernel
//!
//! Dense pixel math (Otsu thresholding, Canny edges, color keying, depth
//! conversion, line suppression, HOG descriptors) is provided by an
//! external kernel behind the [`NumericKernel`] trait. The kernel sees
//! buffers only through [`RawImage`] / [`RawImageMut`] views and reports
//! an `i32` status, `0` meaning success.
//!
//! The wrappers in [`ops`] validate depths, allocate results, invoke the
//! kernel and translate its status through the single table in
//! [`status`].

pub mod ops;
pub mod status;

use crate::buffer::PixelBuffer;

/// Read-only view of a pixel buffer handed to the kernel
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    /// Packed MSB-first words, `stride / 8` per row
    pub data: &'a [u64],
    pub width: u32,
    pub height: u32,
    /// Bytes per row, a multiple of 8
    pub stride: usize,
    /// Bits per pixel
    pub depth: u32,
}

/// Writable view of a pixel buffer handed to the kernel
#[derive(Debug)]
pub struct RawImageMut<'a> {
    pub data: &'a mut [u64],
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub depth: u32,
}

/// Canny hysteresis thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    pub low: f32,
    pub high: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
        }
    }
}

/// Color key: pixels within `tolerance` (per channel) of `key` are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorKeyParams {
    /// Key color as `0xRRGGBB`
    pub key: u32,
    pub tolerance: u8,
}

/// Line suppression options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSuppressParams {
    /// Minimum run length, in pixels, treated as a line
    pub min_length: u32,
    pub horizontal: bool,
    pub vertical: bool,
}

impl Default for LineSuppressParams {
    fn default() -> Self {
        Self {
            min_length: 50,
            horizontal: true,
            vertical: true,
        }
    }
}

/// Histogram-of-oriented-gradients layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HogParams {
    /// Cell edge length in pixels
    pub cell_size: u32,
    /// Block edge length in cells
    pub block_size: u32,
    /// Orientation bins per cell
    pub bins: u32,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            cell_size: 8,
            block_size: 2,
            bins: 9,
        }
    }
}

impl HogParams {
    /// Number of `f32` values in the descriptor of a `width x height`
    /// image, or `None` if the image holds fewer cells than one block.
    pub fn descriptor_len(&self, width: u32, height: u32) -> Option<usize> {
        if self.cell_size == 0 || self.block_size == 0 || self.bins == 0 {
            return None;
        }
        let cells_x = width / self.cell_size;
        let cells_y = height / self.cell_size;
        if cells_x < self.block_size || cells_y < self.block_size {
            return None;
        }
        let blocks = (cells_x - self.block_size + 1) as usize * (cells_y - self.block_size + 1) as usize;
        Some(blocks * (self.block_size * self.block_size * self.bins) as usize)
    }
}

/// The external numeric kernel.
///
/// Every method returns a status code; `0` is success and anything else is
/// mapped by [`status::check_status`]. Implementations must only write the
/// destination they are given.
pub trait NumericKernel {
    /// Binarize an 8-bpp image with an automatically chosen threshold.
    fn otsu(&self, src: RawImage<'_>, dst: RawImageMut<'_>) -> i32;

    /// Canny edge map of an 8-bpp image into a 1-bpp destination.
    fn canny(&self, src: RawImage<'_>, dst: RawImageMut<'_>, params: &CannyParams) -> i32;

    /// Mark pixels matching a key color; `dst` is 1, 8 or 32 bpp.
    fn color_key(&self, src: RawImage<'_>, dst: RawImageMut<'_>, params: &ColorKeyParams) -> i32;

    /// Convert `src` to the depth of `dst`.
    fn convert_depth(&self, src: RawImage<'_>, dst: RawImageMut<'_>) -> i32;

    /// Remove long horizontal and/or vertical runs from a 1-bpp image.
    fn suppress_lines(
        &self,
        src: RawImage<'_>,
        dst: RawImageMut<'_>,
        params: &LineSuppressParams,
    ) -> i32;

    /// Fill `out` with the HOG descriptor of an 8-bpp image.
    fn hog(&self, src: RawImage<'_>, params: &HogParams, out: &mut [f32]) -> i32;
}

impl PixelBuffer {
    /// Borrow the buffer as a kernel view.
    pub fn raw(&self) -> RawImage<'_> {
        RawImage {
            data: self.data(),
            width: self.width(),
            height: self.height(),
            stride: self.stride(),
            depth: self.depth().bits(),
        }
    }

    /// Borrow the buffer as a writable kernel view.
    ///
    /// The kernel may leave garbage in pad bits; callers clear them after
    /// the kernel returns.
    pub fn raw_mut(&mut self) -> RawImageMut<'_> {
        let (width, height, stride, depth) =
            (self.width(), self.height(), self.stride(), self.depth().bits());
        RawImageMut {
            data: self.data_mut(),
            width,
            height,
            stride,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelDepth;

    #[test]
    fn test_raw_views_describe_layout() {
        let mut buf = PixelBuffer::new(65, 3, PixelDepth::Bit1).unwrap();
        let raw = buf.raw();
        assert_eq!((raw.width, raw.height, raw.stride, raw.depth), (65, 3, 16, 1));
        assert_eq!(raw.data.len(), 6);
        let raw = buf.raw_mut();
        raw.data[0] = 1;
        assert_eq!(buf.data()[0], 1);
    }

    #[test]
    fn test_hog_descriptor_len() {
        let p = HogParams::default();
        // 8x8 cells -> 7x7 blocks of 2x2 cells x 9 bins
        assert_eq!(p.descriptor_len(64, 64), Some(49 * 36));
        assert_eq!(p.descriptor_len(15, 64), None);
        let bad = HogParams { bins: 0, ..p };
        assert_eq!(bad.descriptor_len(64, 64), None);
    }
}
