//! pixkit-test - Regression test helpers for pixkit
//!
//! Provides [`RegParams`], which accumulates comparison results over a test
//! and reports them at the end, plus small synthetic fixtures so tests do
//! not depend on image files.
//!
//! # Usage
//!
//! ```ignore
//! use pixkit_test::{RegParams, fixtures};
//!
//! let mut rp = RegParams::new("morph");
//! let pix = fixtures::blob_16x16().unwrap();
//! let sel = pixkit_morph::StructuringElement::square(3).unwrap();
//! let opened = pixkit_morph::open(&pix, &sel, 1).unwrap();
//! rp.compare_pix(&opened, &pixkit_morph::open(&opened, &sel, 1).unwrap());
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

/// Synthetic test images
pub mod fixtures {
    use crate::error::{TestError, TestResult};
    use pixkit_core::{PixelBuffer, PixelDepth};
    use rand::prelude::*;
    use rand::rngs::StdRng;

    /// Build a 1-bpp buffer from rows of text; `x` or `#` is a set pixel,
    /// anything else is clear.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Fixture`] for empty input or ragged rows.
    pub fn from_ascii(rows: &[&str]) -> TestResult<PixelBuffer> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 || height == 0 {
            return Err(TestError::Fixture {
                message: "ascii fixture must not be empty".into(),
            });
        }
        let mut pix = PixelBuffer::new(width as u32, height as u32, PixelDepth::Bit1)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(TestError::Fixture {
                    message: format!("row {y} has {} columns, expected {width}", row.chars().count()),
                });
            }
            for (x, c) in row.chars().enumerate() {
                if c == 'x' || c == '#' {
                    pix.set_pixel(x as u32, y as u32, 1)?;
                }
            }
        }
        Ok(pix)
    }

    /// Render a 1-bpp buffer as rows of `x` and `.`.
    pub fn to_ascii(pix: &PixelBuffer) -> Vec<String> {
        (0..pix.height())
            .map(|y| {
                (0..pix.width())
                    .map(|x| if pix.get_pixel(x, y) == Some(1) { 'x' } else { '.' })
                    .collect()
            })
            .collect()
    }

    /// Rows of [`blob_16x16`]
    pub const BLOB_16X16: [&str; 16] = [
        "................",
        "....xxxxx.......",
        "...xxxxxxx......",
        "..xxxxxxxxx.....",
        "..xxxx.xxxx.....",
        "..xxxxxxxxx..x..",
        "..xxxxxxxxx.....",
        "...xxxxxxx......",
        "....xxxxxxxx....",
        ".......xxxxxx...",
        "........xxxxx...",
        "..x......xxx....",
        "................",
        "....xx......x...",
        "....xx......x...",
        "................",
    ];

    /// A 16x16 binary blob with a hole, a thin tail and a few specks.
    pub fn blob_16x16() -> TestResult<PixelBuffer> {
        from_ascii(&BLOB_16X16)
    }

    /// Random 1-bpp image; each pixel is set with probability `density`.
    pub fn random_binary(width: u32, height: u32, density: f64, seed: u64) -> TestResult<PixelBuffer> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pix = PixelBuffer::new(width, height, PixelDepth::Bit1)?;
        let cutoff = (density.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u64;
        for y in 0..height {
            for x in 0..width {
                if u64::from(rng.next_u32()) < cutoff {
                    pix.set_pixel_unchecked(x, y, 1);
                }
            }
        }
        Ok(pix)
    }

    /// Random image of any depth with uniformly distributed pixel values.
    pub fn random_pixels(width: u32, height: u32, depth: PixelDepth, seed: u64) -> TestResult<PixelBuffer> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pix = PixelBuffer::new(width, height, depth)?;
        let max = depth.max_value();
        for y in 0..height {
            for x in 0..width {
                pix.set_pixel_unchecked(x, y, rng.next_u32() & max);
            }
        }
        Ok(pix)
    }

    /// 8-bpp horizontal ramp from 0 on the left to 255 on the right.
    pub fn gray_ramp(width: u32, height: u32) -> TestResult<PixelBuffer> {
        let mut pix = PixelBuffer::new(width, height, PixelDepth::Bit8)?;
        let span = width.saturating_sub(1).max(1);
        for y in 0..height {
            for x in 0..width {
                pix.set_pixel_unchecked(x, y, x * 255 / span);
            }
        }
        Ok(pix)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_ascii_round_trip() {
            let rows = ["x..", ".x.", "..#"];
            let pix = from_ascii(&rows).unwrap();
            assert_eq!(pix.count_foreground().unwrap(), 3);
            assert_eq!(to_ascii(&pix), vec!["x..", ".x.", "..x"]);
        }

        #[test]
        fn test_ascii_rejects_ragged_rows() {
            assert!(from_ascii(&["xx", "x"]).is_err());
            assert!(from_ascii(&[]).is_err());
        }

        #[test]
        fn test_blob_shape() {
            let blob = blob_16x16().unwrap();
            assert_eq!((blob.width(), blob.height()), (16, 16));
            assert_eq!(blob.get_pixel(6, 4), Some(0));
            assert_eq!(blob.get_pixel(13, 5), Some(1));
        }

        #[test]
        fn test_random_binary_is_deterministic() {
            let a = random_binary(40, 30, 0.3, 7).unwrap();
            let b = random_binary(40, 30, 0.3, 7).unwrap();
            assert_eq!(a, b);
            assert_eq!(random_binary(8, 8, 0.0, 1).unwrap().count_foreground().unwrap(), 0);
        }

        #[test]
        fn test_gray_ramp_ends() {
            let ramp = gray_ramp(256, 2).unwrap();
            assert_eq!(ramp.get_pixel(0, 1), Some(0));
            assert_eq!(ramp.get_pixel(255, 1), Some(255));
        }
    }
}
