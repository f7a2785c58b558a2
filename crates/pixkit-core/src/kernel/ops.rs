//! Kernel-backed operations
//!
//! Each wrapper checks the depths it accepts, allocates its result, runs the
//! kernel against the raw views and maps the status. Results are only
//! handed out (or committed) after the kernel reported success.

use super::status::check_status;
use super::{CannyParams, ColorKeyParams, HogParams, LineSuppressParams, NumericKernel};
use crate::buffer::{PixelBuffer, PixelDepth};
use crate::error::{Error, Result};

fn require_depth(src: &PixelBuffer, accepted: &[PixelDepth]) -> Result<()> {
    if accepted.contains(&src.depth()) {
        Ok(())
    } else {
        Err(Error::UnsupportedDepth(src.depth().bits()))
    }
}

fn log_invocation(operation: &str, src: &PixelBuffer) {
    log::debug!(
        "kernel {operation} on {}x{} at {} bpp",
        src.width(),
        src.height(),
        src.depth().bits()
    );
}

/// Binarize an 8-bpp image with an Otsu threshold.
pub fn threshold_otsu<K: NumericKernel + ?Sized>(kernel: &K, src: &PixelBuffer) -> Result<PixelBuffer> {
    require_depth(src, &[PixelDepth::Bit8])?;
    let mut dst = PixelBuffer::new(src.width(), src.height(), PixelDepth::Bit1)?;
    log_invocation("otsu", src);
    check_status("otsu", kernel.otsu(src.raw(), dst.raw_mut()))?;
    dst.clear_pad_bits();
    Ok(dst)
}

/// Canny edge map of an 8-bpp image as a 1-bpp buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `low > high` or either threshold is
/// negative.
pub fn canny<K: NumericKernel + ?Sized>(
    kernel: &K,
    src: &PixelBuffer,
    params: &CannyParams,
) -> Result<PixelBuffer> {
    require_depth(src, &[PixelDepth::Bit8])?;
    if params.low < 0.0 || params.low > params.high {
        return Err(Error::InvalidArgument(format!(
            "canny thresholds must satisfy 0 <= low <= high: {} / {}",
            params.low, params.high
        )));
    }
    let mut dst = PixelBuffer::new(src.width(), src.height(), PixelDepth::Bit1)?;
    log_invocation("canny", src);
    check_status("canny", kernel.canny(src.raw(), dst.raw_mut(), params))?;
    dst.clear_pad_bits();
    Ok(dst)
}

/// Key out a color of a 24 or 32-bpp image.
///
/// `out_bits` selects the result depth: 1 (mask), 8 (alpha-like weight) or
/// 32 (source with keyed alpha).
///
/// # Errors
///
/// Returns [`Error::UnsupportedDepth`] if the source is not 24/32 bpp or
/// `out_bits` is not 1, 8 or 32.
pub fn color_key<K: NumericKernel + ?Sized>(
    kernel: &K,
    src: &PixelBuffer,
    params: &ColorKeyParams,
    out_bits: u32,
) -> Result<PixelBuffer> {
    require_depth(src, &[PixelDepth::Bit24, PixelDepth::Bit32])?;
    let out_depth = match PixelDepth::from_bits(out_bits)? {
        PixelDepth::Bit24 => return Err(Error::UnsupportedDepth(out_bits)),
        d => d,
    };
    let mut dst = PixelBuffer::new(src.width(), src.height(), out_depth)?;
    log_invocation("color_key", src);
    check_status("color_key", kernel.color_key(src.raw(), dst.raw_mut(), params))?;
    dst.clear_pad_bits();
    Ok(dst)
}

/// Convert to `target_bits` bits per pixel.
///
/// Converting to the current depth returns a copy without calling the
/// kernel.
pub fn convert_depth<K: NumericKernel + ?Sized>(
    kernel: &K,
    src: &PixelBuffer,
    target_bits: u32,
) -> Result<PixelBuffer> {
    let target = PixelDepth::from_bits(target_bits)?;
    if target == src.depth() {
        return Ok(src.clone());
    }
    let mut dst = PixelBuffer::new(src.width(), src.height(), target)?;
    log_invocation("convert_depth", src);
    check_status("convert_depth", kernel.convert_depth(src.raw(), dst.raw_mut()))?;
    dst.clear_pad_bits();
    Ok(dst)
}

/// [`convert_depth`] replacing `buf`; on failure `buf` is untouched.
pub fn convert_depth_in_place<K: NumericKernel + ?Sized>(
    kernel: &K,
    buf: &mut PixelBuffer,
    target_bits: u32,
) -> Result<()> {
    let converted = convert_depth(kernel, buf, target_bits)?;
    buf.commit(converted);
    Ok(())
}

/// Remove long straight runs from a 1-bpp image.
pub fn suppress_lines<K: NumericKernel + ?Sized>(
    kernel: &K,
    src: &PixelBuffer,
    params: &LineSuppressParams,
) -> Result<PixelBuffer> {
    require_depth(src, &[PixelDepth::Bit1])?;
    if params.min_length == 0 {
        return Err(Error::InvalidArgument(
            "line suppression needs a positive min_length".into(),
        ));
    }
    let mut dst = src.create_template();
    log_invocation("suppress_lines", src);
    check_status("suppress_lines", kernel.suppress_lines(src.raw(), dst.raw_mut(), params))?;
    dst.clear_pad_bits();
    Ok(dst)
}

/// HOG descriptor of an 8-bpp image.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if any layout parameter is zero or the
/// image is smaller than one block.
pub fn hog<K: NumericKernel + ?Sized>(kernel: &K, src: &PixelBuffer, params: &HogParams) -> Result<Vec<f32>> {
    require_depth(src, &[PixelDepth::Bit8])?;
    let len = params.descriptor_len(src.width(), src.height()).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "{}x{} image too small for hog layout {:?}",
            src.width(),
            src.height(),
            params
        ))
    })?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { operation: "hog" })?;
    out.resize(len, 0.0f32);
    log_invocation("hog", src);
    check_status("hog", kernel.hog(src.raw(), params, &mut out))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{RawImage, RawImageMut};

    /// Kernel that fills every destination word with all ones, or fails
    /// with a fixed status.
    struct Saturating(i32);

    impl Saturating {
        fn run(&self, dst: RawImageMut<'_>) -> i32 {
            if self.0 == 0 {
                dst.data.fill(u64::MAX);
            }
            self.0
        }
    }

    impl NumericKernel for Saturating {
        fn otsu(&self, _src: RawImage<'_>, dst: RawImageMut<'_>) -> i32 {
            self.run(dst)
        }
        fn canny(&self, _src: RawImage<'_>, dst: RawImageMut<'_>, _p: &CannyParams) -> i32 {
            self.run(dst)
        }
        fn color_key(&self, _src: RawImage<'_>, dst: RawImageMut<'_>, _p: &ColorKeyParams) -> i32 {
            self.run(dst)
        }
        fn convert_depth(&self, _src: RawImage<'_>, dst: RawImageMut<'_>) -> i32 {
            self.run(dst)
        }
        fn suppress_lines(
            &self,
            _src: RawImage<'_>,
            dst: RawImageMut<'_>,
            _p: &LineSuppressParams,
        ) -> i32 {
            self.run(dst)
        }
        fn hog(&self, _src: RawImage<'_>, _p: &HogParams, out: &mut [f32]) -> i32 {
            out.fill(1.0);
            self.0
        }
    }

    #[test]
    fn test_otsu_output_has_clean_pad_bits() {
        let src = PixelBuffer::new(70, 2, PixelDepth::Bit8).unwrap();
        let out = threshold_otsu(&Saturating(0), &src).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit1);
        assert_eq!(out.count_foreground().unwrap(), 140);
    }

    #[test]
    fn test_depth_checks() {
        let bin = PixelBuffer::new(4, 4, PixelDepth::Bit1).unwrap();
        let rgb = PixelBuffer::new(4, 4, PixelDepth::Bit24).unwrap();
        let k = Saturating(0);
        assert_eq!(threshold_otsu(&k, &bin), Err(Error::UnsupportedDepth(1)));
        assert_eq!(
            canny(&k, &rgb, &CannyParams::default()),
            Err(Error::UnsupportedDepth(24))
        );
        assert_eq!(
            color_key(&k, &bin, &ColorKeyParams { key: 0, tolerance: 0 }, 1),
            Err(Error::UnsupportedDepth(1))
        );
        assert_eq!(
            color_key(&k, &rgb, &ColorKeyParams { key: 0, tolerance: 0 }, 24),
            Err(Error::UnsupportedDepth(24))
        );
        assert_eq!(convert_depth(&k, &rgb, 4), Err(Error::UnsupportedDepth(4)));
    }

    #[test]
    fn test_convert_same_depth_skips_kernel() {
        let src = PixelBuffer::new(4, 4, PixelDepth::Bit8).unwrap();
        // A failing kernel is never reached
        assert_eq!(convert_depth(&Saturating(-2), &src, 8).unwrap(), src);
    }

    #[test]
    fn test_failure_status_is_mapped() {
        let src = PixelBuffer::new(4, 4, PixelDepth::Bit8).unwrap();
        assert_eq!(
            threshold_otsu(&Saturating(-9), &src),
            Err(Error::OutOfMemory { operation: "otsu" })
        );
        assert!(matches!(
            hog(&Saturating(-6), &PixelBuffer::new(16, 16, PixelDepth::Bit8).unwrap(), &HogParams::default()),
            Err(Error::OperationFailed { code: -6, .. })
        ));
    }

    #[test]
    fn test_canny_rejects_inverted_thresholds() {
        let src = PixelBuffer::new(4, 4, PixelDepth::Bit8).unwrap();
        let p = CannyParams { low: 10.0, high: 5.0 };
        assert!(matches!(
            canny(&Saturating(0), &src, &p),
            Err(Error::InvalidArgument(_))
        ));
    }
}
