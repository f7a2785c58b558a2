//! Image - a pixel buffer with its coordinate metadata
//!
//! An [`Image`] owns exactly one [`PixelBuffer`]. Alongside the pixels it
//! carries the affine [`Transform`] relating the coordinate system the
//! image was derived from to its own pixel grid, and the x/y resolution.
//! Geometric operations that move the pixel grid keep the transform in
//! step.

use crate::buffer::{CopyPath, ForegroundBounds, PixelBuffer, PixelDepth};
use crate::error::Result;
use crate::geom::{Point, Rect, Transform};

/// A pixel buffer plus coordinate transform and resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    buffer: PixelBuffer,
    transform: Transform,
    xres: i32,
    yres: i32,
}

impl Image {
    /// Wrap a buffer with an identity transform and no resolution.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            transform: Transform::identity(),
            xres: 0,
            yres: 0,
        }
    }

    /// Allocate a zero-initialized image.
    pub fn with_size(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Self::new(PixelBuffer::new(width, height, depth)?))
    }

    /// Replace the coordinate transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the x/y resolution (pixels per inch).
    pub fn with_resolution(mut self, xres: i32, yres: i32) -> Self {
        self.xres = xres;
        self.yres = yres;
        self
    }

    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Get the (x, y) resolution.
    pub fn resolution(&self) -> (i32, i32) {
        (self.xres, self.yres)
    }

    pub fn set_resolution(&mut self, xres: i32, yres: i32) {
        self.xres = xres;
        self.yres = yres;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.buffer.depth()
    }

    /// Crop to `rect`; the result's transform is translated by the crop
    /// origin so the same document point maps to the same pixel.
    pub fn crop(&self, rect: Rect) -> Result<Image> {
        let buffer = self.buffer.crop(rect)?;
        Ok(self.derive(buffer, rect.origin()))
    }

    /// Crop to the foreground plus a margin.
    ///
    /// See [`PixelBuffer::crop_black_area`]. The transform is translated
    /// by the origin of the expanded box; when there is no foreground the
    /// transform is left unchanged.
    pub fn crop_black_area(
        &self,
        bounds: &impl ForegroundBounds,
        dx: u32,
        dy: u32,
    ) -> Result<(Image, Option<Rect>)> {
        let (buffer, region) = self.buffer.crop_black_area(bounds, dx, dy)?;
        let origin = region.map_or(Point::new(0, 0), |r| r.origin());
        Ok((self.derive(buffer, origin), region))
    }

    /// Copy a region of `source` into this image's pixels.
    pub fn copy_in_place(&mut self, dst: Rect, source: &Image, src: Point) -> Result<CopyPath> {
        self.buffer.copy_in_place(dst, &source.buffer, src)
    }

    /// Paste the whole of `source` at `at`.
    pub fn paste(&mut self, source: &Image, at: Point) -> Result<CopyPath> {
        self.buffer.paste(&source.buffer, at)
    }

    fn derive(&self, buffer: PixelBuffer, origin: Point) -> Image {
        Image {
            buffer,
            transform: self
                .transform
                .translate(-f64::from(origin.x), -f64::from(origin.y)),
            xres: self.xres,
            yres: self.yres,
        }
    }
}

impl From<PixelBuffer> for Image {
    fn from(buffer: PixelBuffer) -> Self {
        Image::new(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ScanForegroundBounds;

    #[test]
    fn test_crop_translates_transform() {
        let mut img = Image::with_size(40, 30, PixelDepth::Bit8)
            .unwrap()
            .with_resolution(300, 300);
        img.buffer_mut().set_pixel(12, 9, 7).unwrap();

        let c = img.crop(Rect::new(10, 5, 8, 8)).unwrap();
        assert_eq!(c.buffer().get_pixel(2, 4), Some(7));
        assert_eq!(c.transform().apply(12.0, 9.0), (2.0, 4.0));
        assert_eq!(c.resolution(), (300, 300));
    }

    #[test]
    fn test_crop_black_area_translates_by_expanded_origin() {
        let mut buf = PixelBuffer::new(20, 20, PixelDepth::Bit1).unwrap();
        buf.set_pixel(5, 6, 1).unwrap();
        let img = Image::new(buf);

        let (c, region) = img
            .crop_black_area(&ScanForegroundBounds::new(), 1, 2)
            .unwrap();
        assert_eq!(region, Some(Rect::new(4, 4, 3, 5)));
        assert_eq!(c.transform().apply(5.0, 6.0), (1.0, 2.0));
        assert_eq!(c.buffer().get_pixel(1, 2), Some(1));
    }

    #[test]
    fn test_crop_black_area_without_foreground_keeps_transform() {
        let img = Image::with_size(8, 8, PixelDepth::Bit1)
            .unwrap()
            .with_transform(Transform::identity().translate(3.0, 3.0));
        let (c, region) = img
            .crop_black_area(&ScanForegroundBounds::new(), 0, 0)
            .unwrap();
        assert_eq!(region, None);
        assert_eq!(c.transform(), img.transform());
        assert_eq!((c.width(), c.height()), (1, 1));
    }
}
