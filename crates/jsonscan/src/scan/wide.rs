use super::{Scalar, Strategy};

const WORD: usize = 8;
const LOW7: u64 = 0x7f7f_7f7f_7f7f_7f7f;
const HIGH: u64 = 0x8080_8080_8080_8080;
const ONES: u64 = 0x0101_0101_0101_0101;

#[inline]
const fn splat(b: u8) -> u64 {
    b as u64 * ONES
}

/// High bit set in every byte of `x` that is exactly zero.
///
/// Computed without cross-byte carries, so bytes following a match are never
/// misreported.
#[inline]
const fn zero_bytes(x: u64) -> u64 {
    !(((x & LOW7) + LOW7) | x | LOW7)
}

#[inline]
fn load(chunk: &[u8]) -> u64 {
    let mut word = [0u8; WORD];
    word.copy_from_slice(chunk);
    u64::from_le_bytes(word)
}

/// Offset of the first byte in `word` whose high bit is clear in `matched`.
#[inline]
fn first_miss(matched: u64) -> Option<usize> {
    let miss = !matched & HIGH;
    (miss != 0).then(|| miss.trailing_zeros() as usize / WORD)
}

/// Word-at-a-time strategy: `memchr` for lookups, SWAR for runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wide;

impl Wide {
    fn skip_words(src: &[u8], from: usize, matches: impl Fn(u64) -> u64) -> usize {
        let Some(tail) = src.get(from..) else {
            return from;
        };
        let mut pos = from;
        for chunk in tail.chunks_exact(WORD) {
            if let Some(i) = first_miss(matches(load(chunk))) {
                return pos + i;
            }
            pos += WORD;
        }
        pos
    }
}

impl Strategy for Wide {
    fn find_byte(src: &[u8], from: usize, needle: u8) -> Option<usize> {
        let tail = src.get(from..)?;
        memchr::memchr(needle, tail).map(|i| from + i)
    }

    fn find_either(src: &[u8], from: usize, a: u8, b: u8) -> Option<usize> {
        let tail = src.get(from..)?;
        memchr::memchr2(a, b, tail).map(|i| from + i)
    }

    fn skip_byte_run(src: &[u8], from: usize, byte: u8) -> usize {
        let pattern = splat(byte);
        let pos = Self::skip_words(src, from, |w| zero_bytes(w ^ pattern));
        Scalar::skip_byte_run(src, pos, byte)
    }

    fn skip_space(src: &[u8], from: usize) -> usize {
        const SP: u64 = splat(b' ');
        const TAB: u64 = splat(b'\t');
        const LF: u64 = splat(b'\n');
        const CR: u64 = splat(b'\r');

        let pos = Self::skip_words(src, from, |w| {
            zero_bytes(w ^ SP) | zero_bytes(w ^ TAB) | zero_bytes(w ^ LF) | zero_bytes(w ^ CR)
        });
        Scalar::skip_space(src, pos)
    }
}
