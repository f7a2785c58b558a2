//! Bit-level access and copy over MSB-first packed `u64` words
//!
//! Bit index 0 is the most significant bit of word 0. A field of up to 64
//! bits may start anywhere and span at most two words.

/// Mask with the low `n` bits set (`n <= 64`).
#[inline]
fn low_mask(n: u32) -> u64 {
    if n >= 64 { u64::MAX } else { (1u64 << n) - 1 }
}

/// Read `n` bits (1..=64) starting at bit `bit`, right-aligned in the result.
///
/// # Panics
///
/// Panics if the field extends past the end of `words`.
#[inline]
pub fn read_bits(words: &[u64], bit: usize, n: u32) -> u64 {
    debug_assert!((1..=64).contains(&n));
    let idx = bit / 64;
    let off = (bit % 64) as u32;
    let mut v = words[idx] << off;
    if off + n > 64 {
        v |= words[idx + 1] >> (64 - off);
    }
    v >> (64 - n)
}

/// Write the low `n` bits (1..=64) of `value` starting at bit `bit`.
///
/// # Panics
///
/// Panics if the field extends past the end of `words`.
#[inline]
pub fn write_bits(words: &mut [u64], bit: usize, n: u32, value: u64) {
    debug_assert!((1..=64).contains(&n));
    let idx = bit / 64;
    let off = (bit % 64) as u32;
    let v = value & low_mask(n);
    if off + n <= 64 {
        let shift = 64 - off - n;
        let mask = low_mask(n) << shift;
        words[idx] = (words[idx] & !mask) | (v << shift);
    } else {
        let first = 64 - off;
        let rest = n - first;
        let mask1 = low_mask(first);
        words[idx] = (words[idx] & !mask1) | (v >> rest);
        let shift = 64 - rest;
        let mask2 = low_mask(rest) << shift;
        words[idx + 1] = (words[idx + 1] & !mask2) | (v << shift);
    }
}

/// Copy `count` bits from `src` at `src_bit` to `dst` at `dst_bit`.
///
/// Bits of `dst` outside the target range are preserved.
pub fn copy_bits(dst: &mut [u64], dst_bit: usize, src: &[u64], src_bit: usize, count: usize) {
    if count == 0 {
        return;
    }
    let mut done = 0;
    if dst_bit % 64 == 0 && src_bit % 64 == 0 {
        let whole = count / 64;
        let (d, s) = (dst_bit / 64, src_bit / 64);
        dst[d..d + whole].copy_from_slice(&src[s..s + whole]);
        done = whole * 64;
    }
    while done < count {
        let n = (count - done).min(64) as u32;
        let v = read_bits(src, src_bit + done, n);
        write_bits(dst, dst_bit + done, n, v);
        done += n as usize;
    }
}

/// Copy `count` bits inside one word slice.
///
/// Overlapping ranges are handled as if the source were read completely
/// before the destination is written: the traversal runs forward when the
/// destination precedes the source and backward otherwise.
pub fn copy_bits_within(words: &mut [u64], dst_bit: usize, src_bit: usize, count: usize) {
    if count == 0 || dst_bit == src_bit {
        return;
    }
    if dst_bit < src_bit {
        let mut done = 0;
        while done < count {
            let n = (count - done).min(64) as u32;
            let v = read_bits(words, src_bit + done, n);
            write_bits(words, dst_bit + done, n, v);
            done += n as usize;
        }
    } else {
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(64);
            let start = remaining - n;
            let v = read_bits(words, src_bit + start, n as u32);
            write_bits(words, dst_bit + start, n as u32, v);
            remaining = start;
        }
    }
}
