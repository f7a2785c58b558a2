//! Binary (1 bpp) neighbor reductions
//!
//! For every offset `(dx, dy)` the source row `y + dy` is shifted so that
//! pixel `x + dx` lands on `x`, and the shifted row is OR-ed (dilation) or
//! AND-ed (erosion) into output row `y`, a whole 64-bit word at a time.
//! Pixels read from outside the image take the border bit.

use crate::engine::Reduce;
use pixkit_core::{PixelBuffer, Point};

/// Reduce `src` over `offsets`.
///
/// With `include_center` the source pixel itself takes part in the
/// reduction; without it only the offsets do.
pub(crate) fn reduce(
    src: &PixelBuffer,
    offsets: &[Point],
    op: Reduce,
    fill: bool,
    include_center: bool,
) -> PixelBuffer {
    let mut out = if include_center {
        src.clone()
    } else {
        let mut out = src.create_template();
        if op == Reduce::Min {
            out.set_all();
        }
        out
    };

    let width = src.width();
    let height = i64::from(src.height());
    let mut shifted = vec![0u64; src.wpl() as usize];

    for &o in offsets {
        if include_center && o == Point::new(0, 0) {
            continue;
        }
        for y in 0..src.height() {
            let sy = i64::from(y) + i64::from(o.y);
            if sy < 0 || sy >= height {
                fill_row(&mut shifted, width, fill);
            } else {
                shift_row(&mut shifted, src.row_words(sy as u32), -i64::from(o.x), width, fill);
            }
            let dst = out.row_words_mut(y);
            match op {
                Reduce::Max => dst.iter_mut().zip(&shifted).for_each(|(d, s)| *d |= *s),
                Reduce::Min => dst.iter_mut().zip(&shifted).for_each(|(d, s)| *d &= *s),
            }
        }
    }

    out.clear_pad_bits();
    out
}

/// Write `src` shifted by `shift` pixels into `dst`.
///
/// MSB-first bit ordering: positive shift moves content right (towards
/// higher x), negative shift moves it left. Pixel positions below `width`
/// vacated by the shift are set to `fill`; bits shifted past `width` are
/// left for the caller to clear.
#[allow(clippy::needless_range_loop)]
fn shift_row(dst: &mut [u64], src: &[u64], shift: i64, width: u32, fill: bool) {
    let wpl = dst.len();
    dst.fill(0);

    let abs_shift = shift.unsigned_abs();
    let word_shift = usize::try_from(abs_shift / 64).unwrap_or(usize::MAX);
    let bit_shift = (abs_shift % 64) as u32;

    if word_shift < wpl {
        if shift >= 0 {
            if bit_shift == 0 {
                dst[word_shift..].copy_from_slice(&src[..wpl - word_shift]);
            } else {
                // First valid word: no carry from previous
                dst[word_shift] = src[0] >> bit_shift;
                for i in (word_shift + 1)..wpl {
                    let si = i - word_shift;
                    dst[i] = (src[si] >> bit_shift) | (src[si - 1] << (64 - bit_shift));
                }
            }
        } else {
            let end = wpl - word_shift;
            if bit_shift == 0 {
                dst[..end].copy_from_slice(&src[word_shift..]);
            } else {
                for i in 0..end - 1 {
                    let si = i + word_shift;
                    dst[i] = (src[si] << bit_shift) | (src[si + 1] >> (64 - bit_shift));
                }
                // Last valid word: no carry from next
                dst[end - 1] = src[wpl - 1] << bit_shift;
            }
        }
    }

    if fill {
        let w = u64::from(width);
        let (start, stop) = if shift >= 0 {
            (0, abs_shift.min(w))
        } else {
            (w.saturating_sub(abs_shift), w)
        };
        set_bit_range(dst, start, stop);
    }
}

/// A row read entirely from outside the image.
fn fill_row(dst: &mut [u64], width: u32, fill: bool) {
    dst.fill(0);
    if fill {
        set_bit_range(dst, 0, u64::from(width));
    }
}

/// Set bits `[start, stop)` (MSB-first).
fn set_bit_range(words: &mut [u64], start: u64, stop: u64) {
    let mut bit = start;
    while bit < stop {
        let idx = (bit / 64) as usize;
        let off = bit % 64;
        let n = (stop - bit).min(64 - off);
        let mask = if n == 64 {
            u64::MAX
        } else {
            ((1u64 << n) - 1) << (64 - off - n)
        };
        words[idx] |= mask;
        bit += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixkit_core::PixelDepth;

    /// Pixel-at-a-time reference for [`reduce`].
    fn reduce_reference(src: &PixelBuffer, offsets: &[Point], op: Reduce, fill: bool) -> PixelBuffer {
        let mut out = src.create_template();
        let (w, h) = (src.width() as i32, src.height() as i32);
        for y in 0..h {
            for x in 0..w {
                let mut acc = src.get_pixel(x as u32, y as u32) == Some(1);
                for o in offsets {
                    let (sx, sy) = (x + o.x, y + o.y);
                    let v = if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        fill
                    } else {
                        src.get_pixel(sx as u32, sy as u32) == Some(1)
                    };
                    acc = match op {
                        Reduce::Max => acc || v,
                        Reduce::Min => acc && v,
                    };
                }
                out.set_pixel(x as u32, y as u32, u32::from(acc)).unwrap();
            }
        }
        out
    }

    fn scattered(w: u32, h: u32) -> PixelBuffer {
        let mut pix = PixelBuffer::new(w, h, PixelDepth::Bit1).unwrap();
        for y in 0..h {
            for x in 0..w {
                if (x * 7 + y * 13) % 5 == 0 || (x / 9 + y / 4) % 3 == 0 {
                    pix.set_pixel(x, y, 1).unwrap();
                }
            }
        }
        pix
    }

    #[test]
    fn test_shift_row_right_and_left() {
        let src = [0x8000_0000_0000_0001u64, 0x8000_0000_0000_0000];
        let mut dst = [0u64; 2];
        shift_row(&mut dst, &src, 1, 70, false);
        assert_eq!(dst, [0x4000_0000_0000_0000u64, 0xC000_0000_0000_0000]);
        shift_row(&mut dst, &src, -1, 70, false);
        assert_eq!(dst, [3u64, 0]);
        shift_row(&mut dst, &src, 64, 70, true);
        // Pixel 63 lands in the pad area; the caller clears it
        assert_eq!(dst, [u64::MAX, 0x8000_0000_0000_0001]);
    }

    #[test]
    fn test_shift_row_fill_on_left_shift() {
        let src = [0u64; 2];
        let mut dst = [0u64; 2];
        // Width 70, shift 3 left: pixels 67..70 come from outside
        shift_row(&mut dst, &src, -3, 70, true);
        assert_eq!(dst, [0u64, 0b111 << 58]);
    }

    #[test]
    fn test_reduce_matches_reference() {
        let src = scattered(131, 9);
        let offsets = [
            Point::new(-1, 0),
            Point::new(2, -1),
            Point::new(0, 3),
            Point::new(-65, 1),
            Point::new(70, 0),
        ];
        for op in [Reduce::Max, Reduce::Min] {
            for fill in [false, true] {
                let fast = reduce(&src, &offsets, op, fill, true);
                let slow = reduce_reference(&src, &offsets, op, fill);
                assert_eq!(fast, slow, "op {op:?} fill {fill}");
            }
        }
    }

    #[test]
    fn test_reduce_without_center() {
        let mut src = PixelBuffer::new(5, 5, PixelDepth::Bit1).unwrap();
        src.set_pixel(2, 2, 1).unwrap();
        let out = reduce(&src, &[Point::new(1, 0)], Reduce::Max, false, false);
        // Only (1, 2) sees a set pixel at x + 1
        assert_eq!(out.count_foreground().unwrap(), 1);
        assert_eq!(out.get_pixel(1, 2), Some(1));
        assert_eq!(out.get_pixel(2, 2), Some(0));
    }
}
