//! Number to text conversion into caller buffers.
//!
//! Integers print exactly. Doubles print the shortest text that reads back to
//! the same bits, always with a `.` or an exponent so they lex back as
//! [`Number::Double`](crate::Number::Double).

/// Writes `val` in decimal to the start of `out`, returning the length.
pub fn i64toa(out: &mut [u8; 20], val: i64) -> usize {
    let mut buf = itoa::Buffer::new();
    put(out, buf.format(val).as_bytes())
}

/// Writes `val` in decimal to the start of `out`, returning the length.
pub fn u64toa(out: &mut [u8; 20], val: u64) -> usize {
    let mut buf = itoa::Buffer::new();
    put(out, buf.format(val).as_bytes())
}

/// Writes the shortest round-tripping text of `val` to the start of `out`,
/// returning the length.
///
/// `val` must be finite: JSON has no spelling for NaN or infinities. Such
/// values are written as `NaN`, `inf` or `-inf` in release builds.
///
/// # Examples
///
/// ```rust
/// use jsonscan::f64toa;
///
/// let mut out = [0u8; 24];
/// let n = f64toa(&mut out, 0.1);
/// assert_eq!(&out[..n], b"0.1");
/// let n = f64toa(&mut out, 1e21);
/// assert_eq!(&out[..n], b"1e21");
/// ```
pub fn f64toa(out: &mut [u8; 24], val: f64) -> usize {
    debug_assert!(val.is_finite(), "cannot format non-finite {val}");
    let mut buf = ryu::Buffer::new();
    put(out, buf.format(val).as_bytes())
}

fn put(out: &mut [u8], text: &[u8]) -> usize {
    let n = text.len().min(out.len());
    out[..n].copy_from_slice(&text[..n]);
    n
}
