//! Morphology engine
//!
//! Erosion and dilation are neighbor-offset reductions: for every output
//! pixel `q`,
//!
//! ```text
//! out(q) = reduce(in(q), in(q + o) for o in offsets)
//! ```
//!
//! with `reduce` = max (OR at 1 bpp) for dilation and min (AND) for
//! erosion. Opening and closing compose the two with the mirrored element
//! for the second half; despeckling removes set pixels that have no set
//! 8-neighbor.
//!
//! All three call shapes ([`MorphEngine::apply`], [`MorphEngine::apply_into`]
//! and [`MorphEngine::apply_in_place`]) go through the same computation,
//! which always writes into fresh storage; destinations are only touched
//! once the whole operation has succeeded.

use crate::sel::StructuringElement;
use crate::{MorphError, MorphResult, binary, gray};
use pixkit_core::{Image, PixelBuffer, PixelDepth, Point};

/// Reduction applied over the neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reduce {
    /// Dilation
    Max,
    /// Erosion
    Min,
}

/// Value of pixels read from outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// The image background: white (0) at 1 bpp. Above 1 bpp this is the
    /// identity of the reduction, as with [`Border::Neutral`], so padding
    /// never brightens a dilation or darkens an erosion
    #[default]
    Background,
    /// The identity of the reduction: the minimum value for dilation and
    /// the maximum value for erosion, so the border never wins
    Neutral,
    /// A fixed raw pixel value, truncated to the depth
    Constant(u32),
}

impl Border {
    pub(crate) fn resolve(self, depth: PixelDepth, op: Reduce) -> u32 {
        match self {
            Border::Background if depth == PixelDepth::Bit1 => depth.white_value(),
            Border::Background | Border::Neutral => match op {
                Reduce::Max => 0,
                Reduce::Min => depth.max_value(),
            },
            Border::Constant(v) => v & depth.max_value(),
        }
    }
}

/// A morphological operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp<'a> {
    /// Max over the neighborhood, `iterations` times
    Dilate {
        sel: &'a StructuringElement,
        iterations: u32,
    },
    /// Min over the neighborhood, `iterations` times
    Erode {
        sel: &'a StructuringElement,
        iterations: u32,
    },
    /// Erode `iterations` times, then dilate as often with the mirror
    Open {
        sel: &'a StructuringElement,
        iterations: u32,
    },
    /// Dilate `iterations` times, then erode as often with the mirror
    Close {
        sel: &'a StructuringElement,
        iterations: u32,
    },
    /// Remove isolated set pixels (1 bpp only)
    Despeckle,
}

impl MorphOp<'_> {
    fn name(&self) -> &'static str {
        match self {
            MorphOp::Dilate { .. } => "dilate",
            MorphOp::Erode { .. } => "erode",
            MorphOp::Open { .. } => "open",
            MorphOp::Close { .. } => "close",
            MorphOp::Despeckle => "despeckle",
        }
    }
}

/// Morphology engine
///
/// Holds the options shared by every operation: the border policy and an
/// optional anchor that overrides the element's own anchor.
///
/// # Examples
///
/// ```
/// use pixkit_core::{PixelBuffer, PixelDepth};
/// use pixkit_morph::{Border, MorphEngine, MorphOp, StructuringElement};
///
/// let mut pix = PixelBuffer::new(16, 16, PixelDepth::Bit1).unwrap();
/// pix.set_pixel(8, 8, 1).unwrap();
///
/// let sel = StructuringElement::square(3).unwrap();
/// let engine = MorphEngine::new().with_border(Border::Neutral);
/// let grown = engine
///     .apply(MorphOp::Dilate { sel: &sel, iterations: 1 }, &pix)
///     .unwrap();
/// assert_eq!(grown.count_foreground().unwrap(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MorphEngine {
    border: Border,
    anchor: Option<Point>,
}

impl MorphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Override the anchor of every element used by this engine.
    ///
    /// [`Point::UNSET`] restores the element's own anchor.
    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = anchor.into_option();
        self
    }

    #[inline]
    pub fn border(&self) -> Border {
        self.border
    }

    #[inline]
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Apply `op` to `src`, returning a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::UnsupportedDepth`] for 24-bpp input (and for
    /// anything but 1 bpp with [`MorphOp::Despeckle`]) and
    /// [`MorphError::InvalidArgument`] if the resolved anchor lies outside
    /// the element.
    pub fn apply(&self, op: MorphOp<'_>, src: &PixelBuffer) -> MorphResult<PixelBuffer> {
        check_depth(&op, src)?;
        match op {
            MorphOp::Dilate { sel, iterations } => {
                let sel = self.bind(sel)?;
                self.repeat(src, &sel, Reduce::Max, iterations)
            }
            MorphOp::Erode { sel, iterations } => {
                let sel = self.bind(sel)?;
                self.repeat(src, &sel, Reduce::Min, iterations)
            }
            MorphOp::Open { sel, iterations } => {
                let sel = self.bind(sel)?;
                let eroded = self.repeat(src, &sel, Reduce::Min, iterations)?;
                self.repeat(&eroded, &sel.mirror(), Reduce::Max, iterations)
            }
            MorphOp::Close { sel, iterations } => {
                let sel = self.bind(sel)?;
                let dilated = self.repeat(src, &sel, Reduce::Max, iterations)?;
                self.repeat(&dilated, &sel.mirror(), Reduce::Min, iterations)
            }
            MorphOp::Despeckle => despeckle_binary(src),
        }
    }

    /// Apply `op` to `src` and store the result in `dst`.
    ///
    /// `dst` is reallocated if its size or depth differs from the result.
    /// On error `dst` is left unchanged.
    pub fn apply_into(
        &self,
        op: MorphOp<'_>,
        src: &PixelBuffer,
        dst: &mut PixelBuffer,
    ) -> MorphResult<()> {
        let result = self.apply(op, src)?;
        dst.commit(result);
        Ok(())
    }

    /// Apply `op` to `buf` in place. On error `buf` is left unchanged.
    pub fn apply_in_place(&self, op: MorphOp<'_>, buf: &mut PixelBuffer) -> MorphResult<()> {
        let result = self.apply(op, buf)?;
        buf.commit(result);
        Ok(())
    }

    /// Apply `op` to the pixels of `src`, keeping its transform and
    /// resolution.
    pub fn apply_image(&self, op: MorphOp<'_>, src: &Image) -> MorphResult<Image> {
        let (xres, yres) = src.resolution();
        let buffer = self.apply(op, src.buffer())?;
        Ok(Image::new(buffer)
            .with_transform(*src.transform())
            .with_resolution(xres, yres))
    }

    /// Apply `op` to the pixels of `image` in place. On error `image` is
    /// left unchanged.
    pub fn apply_image_in_place(&self, op: MorphOp<'_>, image: &mut Image) -> MorphResult<()> {
        self.apply_in_place(op, image.buffer_mut())
    }

    pub fn dilate(
        &self,
        src: &PixelBuffer,
        sel: &StructuringElement,
        iterations: u32,
    ) -> MorphResult<PixelBuffer> {
        self.apply(MorphOp::Dilate { sel, iterations }, src)
    }

    pub fn erode(
        &self,
        src: &PixelBuffer,
        sel: &StructuringElement,
        iterations: u32,
    ) -> MorphResult<PixelBuffer> {
        self.apply(MorphOp::Erode { sel, iterations }, src)
    }

    pub fn open(
        &self,
        src: &PixelBuffer,
        sel: &StructuringElement,
        iterations: u32,
    ) -> MorphResult<PixelBuffer> {
        self.apply(MorphOp::Open { sel, iterations }, src)
    }

    pub fn close(
        &self,
        src: &PixelBuffer,
        sel: &StructuringElement,
        iterations: u32,
    ) -> MorphResult<PixelBuffer> {
        self.apply(MorphOp::Close { sel, iterations }, src)
    }

    pub fn despeckle(&self, src: &PixelBuffer) -> MorphResult<PixelBuffer> {
        self.apply(MorphOp::Despeckle, src)
    }

    /// Pin the element to the anchor this engine resolves for it, so the
    /// mirror of a composite operation reflects the anchor actually used.
    fn bind(&self, sel: &StructuringElement) -> MorphResult<StructuringElement> {
        let anchor = sel.resolve_anchor(self.anchor)?;
        sel.clone().with_anchor(anchor)
    }

    fn repeat(
        &self,
        src: &PixelBuffer,
        sel: &StructuringElement,
        op: Reduce,
        iterations: u32,
    ) -> MorphResult<PixelBuffer> {
        if iterations == 0 {
            return Ok(src.clone());
        }
        let border = self.border.resolve(src.depth(), op);

        let passes: Vec<Vec<Point>> = match sel.separable_passes(None)? {
            Some((row, column)) => {
                log::trace!(
                    "{:?} {}x{} {:?}: separable, {} + {} offsets",
                    op,
                    sel.width(),
                    sel.height(),
                    sel.shape(),
                    row.len(),
                    column.len()
                );
                vec![row.collect(), column.collect()]
            }
            None => {
                log::trace!(
                    "{:?} {}x{} {:?}: direct, {} offsets",
                    op,
                    sel.width(),
                    sel.height(),
                    sel.shape(),
                    sel.element_count()
                );
                vec![sel.elements(None)?.collect()]
            }
        };

        let mut current = reduce(src, &passes[0], op, border);
        for offsets in passes.iter().skip(1) {
            current = reduce(&current, offsets, op, border);
        }
        for _ in 1..iterations {
            for offsets in &passes {
                current = reduce(&current, offsets, op, border);
            }
        }
        Ok(current)
    }
}

fn reduce(src: &PixelBuffer, offsets: &[Point], op: Reduce, border: u32) -> PixelBuffer {
    match src.depth() {
        PixelDepth::Bit1 => binary::reduce(src, offsets, op, border != 0, true),
        _ => gray::reduce(src, offsets, op, border),
    }
}

fn check_depth(op: &MorphOp<'_>, src: &PixelBuffer) -> MorphResult<()> {
    let depth = src.depth();
    let supported = match op {
        MorphOp::Despeckle => depth == PixelDepth::Bit1,
        _ => depth != PixelDepth::Bit24,
    };
    if supported {
        return Ok(());
    }
    log::debug!("{} rejected {} bpp input", op.name(), depth.bits());
    Err(MorphError::UnsupportedDepth {
        expected: match op {
            MorphOp::Despeckle => "1-bpp binary",
            _ => "1, 8 or 32 bpp",
        },
        actual: depth.bits(),
    })
}

/// `src AND (OR of the 8-neighborhood)`, with a background border.
fn despeckle_binary(src: &PixelBuffer) -> MorphResult<PixelBuffer> {
    let ring: Vec<Point> = StructuringElement::rectangle(3, 3)?.elements(None)?.collect();
    let mut out = binary::reduce(src, &ring, Reduce::Max, false, false);
    out.and_in_place(src)?;
    Ok(out)
}

/// Dilate with the default engine.
pub fn dilate(src: &PixelBuffer, sel: &StructuringElement, iterations: u32) -> MorphResult<PixelBuffer> {
    MorphEngine::default().dilate(src, sel, iterations)
}

/// Erode with the default engine.
pub fn erode(src: &PixelBuffer, sel: &StructuringElement, iterations: u32) -> MorphResult<PixelBuffer> {
    MorphEngine::default().erode(src, sel, iterations)
}

/// Open with the default engine.
pub fn open(src: &PixelBuffer, sel: &StructuringElement, iterations: u32) -> MorphResult<PixelBuffer> {
    MorphEngine::default().open(src, sel, iterations)
}

/// Close with the default engine.
pub fn close(src: &PixelBuffer, sel: &StructuringElement, iterations: u32) -> MorphResult<PixelBuffer> {
    MorphEngine::default().close(src, sel, iterations)
}

/// Despeckle a 1-bpp image.
pub fn despeckle(src: &PixelBuffer) -> MorphResult<PixelBuffer> {
    MorphEngine::default().despeckle(src)
}
