//! Grayscale (8 bpp) and color (32 bpp) neighbor reductions
//!
//! 8-bpp pixels reduce with plain min/max. 32-bpp pixels reduce each
//! `0xRRGGBBAA` channel independently.

use crate::engine::Reduce;
use pixkit_core::color::CHANNEL_SHIFTS;
use pixkit_core::{PixelBuffer, PixelDepth, Point};

fn max_gray(a: u32, b: u32) -> u32 {
    a.max(b)
}

fn min_gray(a: u32, b: u32) -> u32 {
    a.min(b)
}

fn max_rgba(a: u32, b: u32) -> u32 {
    CHANNEL_SHIFTS.iter().fold(0, |acc, &s| {
        acc | (((a >> s) & 0xff).max((b >> s) & 0xff) << s)
    })
}

fn min_rgba(a: u32, b: u32) -> u32 {
    CHANNEL_SHIFTS.iter().fold(0, |acc, &s| {
        acc | (((a >> s) & 0xff).min((b >> s) & 0xff) << s)
    })
}

/// Reduce `src` over `offsets`; the source pixel itself always takes part.
///
/// Reads outside the image return `border`.
pub(crate) fn reduce(src: &PixelBuffer, offsets: &[Point], op: Reduce, border: u32) -> PixelBuffer {
    let combine: fn(u32, u32) -> u32 = match (src.depth(), op) {
        (PixelDepth::Bit32, Reduce::Max) => max_rgba,
        (PixelDepth::Bit32, Reduce::Min) => min_rgba,
        (_, Reduce::Max) => max_gray,
        (_, Reduce::Min) => min_gray,
    };

    let (w, h) = (src.width() as usize, src.height() as usize);
    let input: Vec<u32> = (0..h)
        .flat_map(|y| (0..w).map(move |x| src.get_pixel_unchecked(x as u32, y as u32)))
        .collect();
    let mut acc = input.clone();

    for &o in offsets {
        if o == Point::new(0, 0) {
            continue;
        }
        for y in 0..h {
            let row = &mut acc[y * w..(y + 1) * w];
            let sy = y as i64 + i64::from(o.y);
            if sy < 0 || sy >= h as i64 {
                row.iter_mut().for_each(|a| *a = combine(*a, border));
                continue;
            }
            let src_row = &input[sy as usize * w..(sy as usize + 1) * w];
            for (x, a) in row.iter_mut().enumerate() {
                let sx = x as i64 + i64::from(o.x);
                let v = if sx < 0 || sx >= w as i64 {
                    border
                } else {
                    src_row[sx as usize]
                };
                *a = combine(*a, v);
            }
        }
    }

    let mut out = src.create_template();
    for (i, &v) in acc.iter().enumerate() {
        out.set_pixel_unchecked((i % w) as u32, (i / w) as u32, v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channelwise_max_min() {
        assert_eq!(max_rgba(0x10FF_2080, 0x2000_3040), 0x20FF_3080);
        assert_eq!(min_rgba(0x10FF_2080, 0x2000_3040), 0x1000_2040);
    }

    #[test]
    fn test_gray_dilate_spreads_bright_pixel() {
        let mut src = PixelBuffer::new(5, 5, PixelDepth::Bit8).unwrap();
        src.set_pixel(2, 2, 200).unwrap();
        let offsets = [Point::new(-1, 0), Point::new(1, 0)];
        let out = reduce(&src, &offsets, Reduce::Max, 0);
        assert_eq!(out.get_pixel(1, 2), Some(200));
        assert_eq!(out.get_pixel(3, 2), Some(200));
        assert_eq!(out.get_pixel(2, 1), Some(0));
    }

    #[test]
    fn test_border_value_used_outside() {
        let src = PixelBuffer::new_white(4, 3, PixelDepth::Bit8).unwrap();
        let offsets = [Point::new(0, -1)];
        let out = reduce(&src, &offsets, Reduce::Min, 10);
        assert_eq!(out.get_pixel(0, 0), Some(10));
        assert_eq!(out.get_pixel(0, 1), Some(255));
    }

    #[test]
    fn test_rgba_erode() {
        let mut src = PixelBuffer::new_white(3, 1, PixelDepth::Bit32).unwrap();
        src.set_pixel(1, 0, 0x00FF_FFFF).unwrap();
        let out = reduce(&src, &[Point::new(1, 0)], Reduce::Min, u32::MAX);
        assert_eq!(out.get_pixel(0, 0), Some(0x00FF_FFFF));
        assert_eq!(out.get_pixel(1, 0), Some(0x00FF_FFFF));
        assert_eq!(out.get_pixel(2, 0), Some(u32::MAX));
    }
}
