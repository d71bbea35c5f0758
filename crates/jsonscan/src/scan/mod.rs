//! Byte search primitives shared by every scanner in the crate.
//!
//! Each primitive exists in two interchangeable strategies:
//!
//! - [`Scalar`] walks the buffer one byte at a time.
//! - [`Wide`] compares many bytes per step: `memchr` vector search for
//!   needle lookups and 8-byte SWAR words for run skipping.
//!
//! Both return identical results for every input. Wide loads are taken from
//! `chunks_exact` views, so no read ever crosses the end of the slice; the
//! remainder shorter than one word is finished by the scalar loop.
//!
//! Offsets are absolute indexes into `src`. A starting offset at or past the
//! end of the buffer finds nothing and skips nothing; [`lspace`] additionally
//! clamps such an offset to `src.len()`.

mod scalar;
mod wide;

pub use scalar::Scalar;
pub use wide::Wide;

/// A byte-search strategy.
pub trait Strategy {
    /// Offset of the first `needle` at or after `from`.
    fn find_byte(src: &[u8], from: usize, needle: u8) -> Option<usize>;

    /// Offset of the first `a` or `b` at or after `from`.
    fn find_either(src: &[u8], from: usize, a: u8, b: u8) -> Option<usize>;

    /// Offset one past the run of `byte` starting at `from`.
    fn skip_byte_run(src: &[u8], from: usize, byte: u8) -> usize;

    /// Offset of the first byte at or after `from` that is not JSON
    /// whitespace (space, tab, line feed, carriage return).
    fn skip_space(src: &[u8], from: usize) -> usize;

    /// Offset of the next `"` at or after `from` that is not escaped by a
    /// backslash. A backslash escapes exactly the byte after it.
    fn find_quote(src: &[u8], from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let at = Self::find_either(src, pos, b'"', b'\\')?;
            if src[at] == b'"' {
                return Some(at);
            }
            pos = at + 2;
        }
    }
}

#[inline]
pub(crate) const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Number of consecutive ASCII `'0'` digits starting at `pos`.
#[must_use]
pub fn lzero(src: &[u8], pos: usize) -> usize {
    Wide::skip_byte_run(src, pos, b'0').saturating_sub(pos)
}

/// Offset of the first non-whitespace byte at or after `pos`, or
/// `src.len()` when only whitespace remains. A `pos` past the end is
/// clamped to `src.len()`.
#[must_use]
pub fn lspace(src: &[u8], pos: usize) -> usize {
    Wide::skip_space(src, pos.min(src.len()))
}

/// Offset of the next unescaped `"` at or after `pos`.
#[must_use]
pub fn lquote(src: &[u8], pos: usize) -> Option<usize> {
    Wide::find_quote(src, pos)
}

/// Offset of the next `ch` at or after `pos`.
#[must_use]
pub fn strchr1(src: &[u8], pos: usize, ch: u8) -> Option<usize> {
    Wide::find_byte(src, pos, ch)
}

/// Offset of the next `c0` or `c1` at or after `pos`.
#[must_use]
pub fn strchr2(src: &[u8], pos: usize, c0: u8, c1: u8) -> Option<usize> {
    Wide::find_either(src, pos, c0, c1)
}
