//! Point, Size, Rect and Transform value types
//!
//! These are small `Copy` types; regions use signed coordinates so that a
//! request starting left of or above the image can be represented and
//! rejected instead of wrapping around.

use crate::error::{Error, Result};

/// An integer position or offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The "not set" anchor sentinel `(-1, -1)`.
    ///
    /// APIs taking an `Option<Point>` anchor treat this value like `None`.
    pub const UNSET: Point = Point { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Map the sentinel [`Point::UNSET`] to `None`.
    #[inline]
    pub fn into_option(self) -> Option<Point> {
        if self == Self::UNSET { None } else { Some(self) }
    }
}

/// An integer extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// A rectangle region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle without validation.
    ///
    /// Operations that consume a `Rect` validate it against the buffer
    /// they are applied to.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle, rejecting non-positive sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `w <= 0` or `h <= 0`.
    pub fn try_new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w <= 0 || h <= 0 {
            return Err(Error::InvalidArgument(format!(
                "rectangle must have a positive size: {w}x{h}"
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// The empty rectangle at the origin.
    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Get the right x coordinate (exclusive), saturating at `i32::MAX`
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Get the bottom y coordinate (exclusive), saturating at `i32::MAX`
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rectangle is empty (zero or negative area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Grow the rectangle by `dx` on the left and right and `dy` on the
    /// top and bottom.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the grown rectangle does not
    /// fit `i32` coordinates.
    pub fn expand(&self, dx: u32, dy: u32) -> Result<Rect> {
        let (dx, dy) = (i64::from(dx), i64::from(dy));
        let fit = |v: i64| {
            i32::try_from(v).map_err(|_| {
                Error::InvalidArgument(format!(
                    "rectangle {self:?} grown by {dx}x{dy} leaves the i32 range"
                ))
            })
        };
        Ok(Rect::new(
            fit(i64::from(self.x) - dx)?,
            fit(i64::from(self.y) - dy)?,
            fit(i64::from(self.w) + 2 * dx)?,
            fit(i64::from(self.h) + 2 * dy)?,
        ))
    }

    /// Intersection of two rectangles, `None` if they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let end = |start: i32, len: i32| i64::from(start) + i64::from(len);
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = end(self.x, self.w).min(end(other.x, other.w));
        let b = end(self.y, self.h).min(end(other.y, other.h));
        if r <= i64::from(x) || b <= i64::from(y) {
            return None;
        }
        // Bounded by the narrower operand's own extent
        Some(Rect::new(
            x,
            y,
            (r - i64::from(x)) as i32,
            (b - i64::from(y)) as i32,
        ))
    }
}

/// 2-D affine coordinate transform
///
/// Maps a point `(x, y)` of the coordinate system an image was derived from
/// to `(a*x + b*y + tx, c*x + d*y + ty)` in the image's own pixel grid.
/// Cropping an image composes a translation onto its transform so that
/// geometric results computed on the crop can be related back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Compose a translation after this transform.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..*self
        }
    }

    /// Compose `next` after this transform (`next ∘ self`).
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            tx: next.a * self.tx + next.b * self.ty + next.tx,
            ty: next.c * self.tx + next.d * self.ty + next.ty,
        }
    }

    /// Apply the transform to a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_try_new_rejects_non_positive() {
        assert!(Rect::try_new(0, 0, 0, 4).is_err());
        assert!(Rect::try_new(0, 0, 4, -1).is_err());
        assert!(Rect::try_new(-3, 2, 4, 4).is_ok());
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 6, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 6, 5, 4)));
        assert_eq!(a.intersect(&Rect::new(10, 0, 3, 3)), None);
    }

    #[test]
    fn test_rect_expand() {
        let r = Rect::new(4, 5, 2, 3).expand(1, 2).unwrap();
        assert_eq!(r, Rect::new(3, 3, 4, 7));
        assert!(matches!(
            Rect::new(0, 0, 5, 5).expand(1 << 30, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Rect::new(i32::MIN + 1, 0, 1, 1).expand(2, 0).is_err());
    }

    #[test]
    fn test_rect_extremes_do_not_overflow() {
        let far = Rect::new(i32::MAX - 1, 0, 10, 10);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.intersect(&Rect::new(0, 0, 16, 16)), None);
        assert_eq!(
            far.intersect(&Rect::new(i32::MAX - 5, 2, 5, 3)),
            Some(Rect::new(i32::MAX - 1, 2, 1, 3))
        );
        assert!(!far.contains_point(0, 0));
    }

    #[test]
    fn test_point_unset() {
        assert_eq!(Point::UNSET.into_option(), None);
        assert_eq!(Point::new(0, 0).into_option(), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_transform_translate_and_compose() {
        let t = Transform::identity().translate(-3.0, -4.0);
        assert_eq!(t.apply(3.0, 4.0), (0.0, 0.0));

        let scale = Transform {
            a: 2.0,
            d: 2.0,
            ..Transform::identity()
        };
        let composed = t.then(&scale);
        assert_eq!(composed.apply(4.0, 5.0), (2.0, 2.0));
    }
}
