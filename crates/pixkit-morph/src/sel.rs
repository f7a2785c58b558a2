//! Structuring elements for morphological operations
//!
//! A structuring element is described declaratively by its shape, size and
//! optional anchor. The neighbor offsets it stands for are produced lazily
//! by [`Elements`], relative to the resolved anchor:
//!
//! | shape       | offsets                                    | count       |
//! |-------------|--------------------------------------------|-------------|
//! | `Rectangle` | every cell except the anchor               | `w*h - 1`   |
//! | `Brick`     | every cell                                 | `w*h`       |
//! | `Cross`     | anchor row plus anchor column, once each   | `w + h - 1` |
//!
//! Every offset is `grid position - anchor`.

use crate::{MorphError, MorphResult};
use pixkit_core::Point;

/// Shape of a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Full rectangle; the anchor cell itself is not an offset
    Rectangle,
    /// Full rectangle including the anchor cell
    Brick,
    /// Horizontal and vertical arms through the anchor
    Cross,
}

/// Structuring element
///
/// Immutable once built and reusable across operations.
///
/// # Examples
///
/// ```
/// use pixkit_morph::StructuringElement;
///
/// let sel = StructuringElement::rectangle(3, 3).unwrap();
/// assert_eq!(sel.element_count(), 8);
/// assert_eq!(sel.elements(None).unwrap().count(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuringElement {
    shape: Shape,
    width: u32,
    height: u32,
    anchor: Option<Point>,
}

impl StructuringElement {
    /// Create an element with no explicit anchor.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] if either dimension is zero
    /// or too large to address with `i32` offsets.
    pub fn new(shape: Shape, width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidArgument(format!(
                "structuring element dimensions must be positive: {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(MorphError::InvalidArgument(format!(
                "structuring element too large: {width}x{height}"
            )));
        }
        Ok(Self {
            shape,
            width,
            height,
            anchor: None,
        })
    }

    pub fn rectangle(width: u32, height: u32) -> MorphResult<Self> {
        Self::new(Shape::Rectangle, width, height)
    }

    pub fn brick(width: u32, height: u32) -> MorphResult<Self> {
        Self::new(Shape::Brick, width, height)
    }

    pub fn cross(width: u32, height: u32) -> MorphResult<Self> {
        Self::new(Shape::Cross, width, height)
    }

    /// `size x size` rectangle
    pub fn square(size: u32) -> MorphResult<Self> {
        Self::rectangle(size, size)
    }

    /// Return a copy with an explicit anchor.
    ///
    /// [`Point::UNSET`] clears the anchor.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] if the anchor lies outside
    /// `[0, width) x [0, height)`.
    pub fn with_anchor(mut self, anchor: Point) -> MorphResult<Self> {
        self.anchor = match anchor.into_option() {
            Some(p) => Some(self.check_anchor(p)?),
            None => None,
        };
        Ok(self)
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Explicit anchor, if one was set
    #[inline]
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Geometric center `(width / 2, height / 2)`
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Resolve the anchor used for an operation.
    ///
    /// The request wins if set, then the element's own anchor, then the
    /// center.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] if the resolved anchor lies
    /// outside the element.
    pub fn resolve_anchor(&self, request: Option<Point>) -> MorphResult<Point> {
        let anchor = request
            .and_then(Point::into_option)
            .or(self.anchor)
            .unwrap_or_else(|| self.center());
        self.check_anchor(anchor)
    }

    fn check_anchor(&self, p: Point) -> MorphResult<Point> {
        if p.x < 0 || p.y < 0 || p.x >= self.width as i32 || p.y >= self.height as i32 {
            return Err(MorphError::InvalidArgument(format!(
                "anchor ({}, {}) outside {}x{} structuring element",
                p.x, p.y, self.width, self.height
            )));
        }
        Ok(p)
    }

    /// Number of offsets [`elements`](Self::elements) yields.
    pub fn element_count(&self) -> usize {
        let (w, h) = (self.width as usize, self.height as usize);
        match self.shape {
            Shape::Rectangle => w * h - 1,
            Shape::Brick => w * h,
            Shape::Cross => w + h - 1,
        }
    }

    /// Offsets of the element for the given request anchor.
    pub fn elements(&self, request: Option<Point>) -> MorphResult<Elements> {
        let anchor = self.resolve_anchor(request)?;
        let pattern = match self.shape {
            Shape::Rectangle => Pattern::Grid { skip_anchor: true },
            Shape::Brick => Pattern::Grid { skip_anchor: false },
            Shape::Cross => Pattern::Cross,
        };
        Ok(Elements::new(pattern, self.width, self.height, anchor))
    }

    fn skips_anchor(&self) -> MorphResult<bool> {
        match self.shape {
            Shape::Rectangle => Ok(true),
            Shape::Brick => Ok(false),
            Shape::Cross => Err(MorphError::InvalidArgument(
                "cross structuring elements are not separable".into(),
            )),
        }
    }

    /// Offsets along the anchor row, for the horizontal pass of a
    /// separable decomposition.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] for [`Shape::Cross`].
    pub fn horizontal_elements(&self, request: Option<Point>) -> MorphResult<Elements> {
        let skip_anchor = self.skips_anchor()?;
        let anchor = self.resolve_anchor(request)?;
        Ok(Elements::new(Pattern::Row { skip_anchor }, self.width, self.height, anchor))
    }

    /// Offsets along the anchor column, for the vertical pass of a
    /// separable decomposition.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidArgument`] for [`Shape::Cross`].
    pub fn vertical_elements(&self, request: Option<Point>) -> MorphResult<Elements> {
        let skip_anchor = self.skips_anchor()?;
        let anchor = self.resolve_anchor(request)?;
        Ok(Elements::new(Pattern::Column { skip_anchor }, self.width, self.height, anchor))
    }

    /// Row pass and column pass, or `None` if the shape must be applied
    /// as a whole.
    pub fn separable_passes(&self, request: Option<Point>) -> MorphResult<Option<(Elements, Elements)>> {
        match self.shape {
            Shape::Cross => {
                self.resolve_anchor(request)?;
                Ok(None)
            }
            Shape::Rectangle | Shape::Brick => Ok(Some((
                self.horizontal_elements(request)?,
                self.vertical_elements(request)?,
            ))),
        }
    }

    /// The reflected element.
    ///
    /// The anchor `(ax, ay)` becomes `(width - ax - 1, height - ay - 1)`.
    /// An odd-by-odd element anchored at its center is its own mirror and
    /// is returned unchanged. Offsets of the mirror are the negated
    /// offsets of `self`.
    pub fn mirror(&self) -> Self {
        let a = self.anchor.unwrap_or_else(|| self.center());
        let odd = self.width % 2 == 1 && self.height % 2 == 1;
        if odd && a == self.center() {
            return self.clone();
        }
        Self {
            anchor: Some(Point::new(
                self.width as i32 - a.x - 1,
                self.height as i32 - a.y - 1,
            )),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Grid { skip_anchor: bool },
    Cross,
    Row { skip_anchor: bool },
    Column { skip_anchor: bool },
}

/// Lazy, restartable sequence of neighbor offsets
///
/// Offsets come out in row-major order. Cloning an `Elements` gives an
/// independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Elements {
    pattern: Pattern,
    width: i32,
    anchor: Point,
    next: usize,
    len: usize,
}

impl Elements {
    fn new(pattern: Pattern, width: u32, height: u32, anchor: Point) -> Self {
        let (w, h) = (width as usize, height as usize);
        let len = match pattern {
            Pattern::Grid { skip_anchor } => w * h - usize::from(skip_anchor),
            Pattern::Cross => w + h - 1,
            Pattern::Row { skip_anchor } => w - usize::from(skip_anchor),
            Pattern::Column { skip_anchor } => h - usize::from(skip_anchor),
        };
        Self {
            pattern,
            width: width as i32,
            anchor,
            next: 0,
            len,
        }
    }

    fn offset_at(&self, i: usize) -> Point {
        let (ax, ay) = (self.anchor.x, self.anchor.y);
        // Step over the anchor position when it is excluded
        let skip = |i: usize, anchor_index: i32, skip_anchor: bool| -> i32 {
            let i = i as i32;
            if skip_anchor && i >= anchor_index { i + 1 } else { i }
        };
        match self.pattern {
            Pattern::Grid { skip_anchor } => {
                let cell = skip(i, ay * self.width + ax, skip_anchor);
                Point::new(cell % self.width - ax, cell / self.width - ay)
            }
            Pattern::Cross => {
                let i = i as i32;
                if i < ay {
                    Point::new(0, i - ay)
                } else if i < ay + self.width {
                    Point::new(i - ay - ax, 0)
                } else {
                    Point::new(0, i - self.width + 1 - ay)
                }
            }
            Pattern::Row { skip_anchor } => Point::new(skip(i, ax, skip_anchor) - ax, 0),
            Pattern::Column { skip_anchor } => Point::new(0, skip(i, ay, skip_anchor) - ay),
        }
    }
}

impl Iterator for Elements {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let p = self.offset_at(self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Elements {}

impl std::iter::FusedIterator for Elements {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(Shape::Rectangle, 3, 3, 8)]
    #[case(Shape::Rectangle, 5, 2, 9)]
    #[case(Shape::Rectangle, 1, 1, 0)]
    #[case(Shape::Brick, 3, 3, 9)]
    #[case(Shape::Brick, 1, 4, 4)]
    #[case(Shape::Cross, 3, 3, 5)]
    #[case(Shape::Cross, 5, 3, 7)]
    #[case(Shape::Cross, 1, 1, 1)]
    fn test_element_counts(
        #[case] shape: Shape,
        #[case] w: u32,
        #[case] h: u32,
        #[case] expected: usize,
    ) {
        let sel = StructuringElement::new(shape, w, h).unwrap();
        assert_eq!(sel.element_count(), expected);
        let elems = sel.elements(None).unwrap();
        assert_eq!(elems.len(), expected);
        let offsets: Vec<Point> = elems.collect();
        assert_eq!(offsets.len(), expected);
        let distinct: HashSet<Point> = offsets.iter().copied().collect();
        assert_eq!(distinct.len(), expected);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            StructuringElement::rectangle(0, 3),
            Err(MorphError::InvalidArgument(_))
        ));
        assert!(StructuringElement::cross(3, 0).is_err());
    }

    #[test]
    fn test_rectangle_offsets_exclude_anchor() {
        let sel = StructuringElement::rectangle(4, 3).unwrap();
        let offsets: Vec<Point> = sel.elements(None).unwrap().collect();
        assert!(!offsets.contains(&Point::new(0, 0)));
        // Anchor resolves to (2, 1)
        assert_eq!(offsets[0], Point::new(-2, -1));
        assert_eq!(*offsets.last().unwrap(), Point::new(1, 1));
    }

    #[test]
    fn test_cross_offsets_row_major() {
        let sel = StructuringElement::cross(3, 3).unwrap();
        let offsets: Vec<Point> = sel.elements(None).unwrap().collect();
        assert_eq!(
            offsets,
            vec![
                Point::new(0, -1),
                Point::new(-1, 0),
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_cross_off_center_anchor() {
        let sel = StructuringElement::cross(4, 3)
            .unwrap()
            .with_anchor(Point::new(0, 2))
            .unwrap();
        let offsets: Vec<Point> = sel.elements(None).unwrap().collect();
        assert_eq!(
            offsets,
            vec![
                Point::new(0, -2),
                Point::new(0, -1),
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(3, 0),
            ]
        );
    }

    #[test]
    fn test_anchor_resolution_order() {
        let sel = StructuringElement::brick(5, 4).unwrap();
        assert_eq!(sel.resolve_anchor(None).unwrap(), Point::new(2, 2));
        assert_eq!(sel.resolve_anchor(Some(Point::UNSET)).unwrap(), Point::new(2, 2));
        let anchored = sel.with_anchor(Point::new(1, 1)).unwrap();
        assert_eq!(anchored.resolve_anchor(None).unwrap(), Point::new(1, 1));
        assert_eq!(
            anchored.resolve_anchor(Some(Point::new(4, 3))).unwrap(),
            Point::new(4, 3)
        );
        assert!(matches!(
            anchored.resolve_anchor(Some(Point::new(5, 0))),
            Err(MorphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_with_anchor_validates() {
        let sel = StructuringElement::rectangle(3, 3).unwrap();
        assert!(sel.clone().with_anchor(Point::new(3, 0)).is_err());
        assert!(sel.clone().with_anchor(Point::new(0, -2)).is_err());
        let cleared = sel
            .with_anchor(Point::new(0, 0))
            .unwrap()
            .with_anchor(Point::UNSET)
            .unwrap();
        assert_eq!(cleared.anchor(), None);
    }

    #[test]
    fn test_elements_restartable() {
        let sel = StructuringElement::rectangle(3, 2).unwrap();
        let mut elems = sel.elements(None).unwrap();
        let snapshot = elems.clone();
        elems.next();
        assert_eq!(elems.len(), 4);
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.clone().collect::<Vec<_>>(), snapshot.collect::<Vec<_>>());
    }

    #[test]
    fn test_separable_passes() {
        let sel = StructuringElement::rectangle(3, 5).unwrap();
        let (h, v) = sel.separable_passes(None).unwrap().unwrap();
        assert_eq!(h.collect::<Vec<_>>(), vec![Point::new(-1, 0), Point::new(1, 0)]);
        assert_eq!(v.len(), 4);

        let brick = StructuringElement::brick(3, 1).unwrap();
        let (h, v) = brick.separable_passes(None).unwrap().unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(v.collect::<Vec<_>>(), vec![Point::new(0, 0)]);

        let cross = StructuringElement::cross(3, 3).unwrap();
        assert!(cross.separable_passes(None).unwrap().is_none());
        assert!(cross.horizontal_elements(None).is_err());
    }

    #[test]
    fn test_mirror_odd_centered_is_identity() {
        let sel = StructuringElement::rectangle(5, 3).unwrap();
        assert_eq!(sel.mirror(), sel);
        let cross = StructuringElement::cross(3, 3).unwrap();
        assert_eq!(cross.mirror(), cross);
    }

    #[test]
    fn test_mirror_twice_restores_anchor() {
        for (w, h, a) in [(4u32, 3u32, None), (5, 5, Some(Point::new(0, 4))), (2, 2, Some(Point::new(1, 0)))] {
            let mut sel = StructuringElement::brick(w, h).unwrap();
            if let Some(a) = a {
                sel = sel.with_anchor(a).unwrap();
            }
            let twice = sel.mirror().mirror();
            assert_eq!(
                twice.resolve_anchor(None).unwrap(),
                sel.resolve_anchor(None).unwrap()
            );
        }
    }

    #[test]
    fn test_mirror_negates_offsets() {
        let sel = StructuringElement::rectangle(4, 2)
            .unwrap()
            .with_anchor(Point::new(0, 0))
            .unwrap();
        let fwd: HashSet<Point> = sel.elements(None).unwrap().collect();
        let back: HashSet<Point> = sel
            .mirror()
            .elements(None)
            .unwrap()
            .map(|p| Point::new(-p.x, -p.y))
            .collect();
        assert_eq!(fwd, back);
    }
}
