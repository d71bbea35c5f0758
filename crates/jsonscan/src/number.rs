//! Number token lexing.
//!
//! Tokens follow `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`. A fraction
//! or exponent marker makes a token floating regardless of its value, so
//! `1.0` and `1e2` are [`Number::Double`] while `12` is
//! [`Number::Integer`]. Bytes following a complete token are left for the
//! caller to judge.

use core::ops::Range;

use lexical_parse_float::FromLexical as _;

use crate::{
    error::{ErrorCode, Result, ScanError},
    scan::lzero,
};

/// A lexed number.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    /// An integral token that fits `i64`.
    Integer(i64),
    /// A token with a fraction or exponent, or an integral token outside
    /// the range of `i64`.
    Double(f64),
}

impl Number {
    /// The value as a double, rounding integers if needed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Double(d) => d,
        }
    }
}

/// Saturation point for the lexed exponent, which keeps its accumulator in
/// range however many digits follow the marker. Any exponent this large
/// already overflows or underflows every double.
const EXP_LIMIT: i64 = 1_000_000;

/// Largest mantissa that converts to `f64` exactly.
const MAX_EXACT_MANTISSA: u64 = 1 << 53;

/// Exact powers of ten representable as `f64`.
const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// The grammatical parts of one number token.
#[derive(Debug, Clone)]
pub(crate) struct Lexeme {
    pub(crate) neg: bool,
    pub(crate) int: Range<usize>,
    pub(crate) frac: Range<usize>,
    pub(crate) exp: i64,
    pub(crate) float: bool,
    pub(crate) end: usize,
}

/// Lexes and decodes the number starting at `*pos`.
///
/// On success `*pos` is moved one past the token.
///
/// # Errors
///
/// - [`ErrorCode::Eof`] if `*pos` is at the end of `src`.
/// - [`ErrorCode::InvalidChar`] if no number starts at `*pos`.
/// - [`ErrorCode::NumberFormat`] at the first byte that breaks the grammar.
/// - [`ErrorCode::Overflow`] if a floating token exceeds the range of `f64`.
///
/// # Examples
///
/// ```rust
/// use jsonscan::{Number, vnumber};
///
/// let mut pos = 0;
/// assert_eq!(vnumber(b"12,", &mut pos), Ok(Number::Integer(12)));
/// assert_eq!(pos, 2);
///
/// let mut pos = 0;
/// assert_eq!(vnumber(b"1.0", &mut pos), Ok(Number::Double(1.0)));
/// ```
pub fn vnumber(src: &[u8], pos: &mut usize) -> Result<Number> {
    let start = *pos;
    expect_number(src, start)?;
    let lx = lex(src, start)?;
    let num = if lx.float {
        Number::Double(to_f64(src, start, &lx)?)
    } else {
        match magnitude(src, lx.int.clone()).and_then(|m| apply_sign(lx.neg, m)) {
            Some(i) => Number::Integer(i),
            None => Number::Double(to_f64(src, start, &lx)?),
        }
    };
    *pos = lx.end;
    Ok(num)
}

/// Lexes an integral token at `*pos` into an `i64`.
///
/// # Errors
///
/// As for [`vnumber`], plus [`ErrorCode::InvalidChar`] at a fraction or
/// exponent marker and [`ErrorCode::Overflow`] (at the token start) when the
/// value does not fit.
pub fn vsigned(src: &[u8], pos: &mut usize) -> Result<i64> {
    let start = *pos;
    expect_number(src, start)?;
    let neg = src[start] == b'-';
    let (digits, end) = integral(src, start + usize::from(neg))?;
    let value = magnitude(src, digits)
        .and_then(|m| apply_sign(neg, m))
        .ok_or(ScanError::new(ErrorCode::Overflow, start))?;
    *pos = end;
    Ok(value)
}

/// Lexes a non-negative integral token at `*pos` into a `u64`.
///
/// # Errors
///
/// As for [`vsigned`]; a leading `-` is [`ErrorCode::InvalidChar`].
pub fn vunsigned(src: &[u8], pos: &mut usize) -> Result<u64> {
    let start = *pos;
    expect_number(src, start)?;
    if src[start] == b'-' {
        return Err(ScanError::new(ErrorCode::InvalidChar, start));
    }
    let (digits, end) = integral(src, start)?;
    let value = magnitude(src, digits).ok_or(ScanError::new(ErrorCode::Overflow, start))?;
    *pos = end;
    Ok(value)
}

fn expect_number(src: &[u8], pos: usize) -> Result<()> {
    match src.get(pos) {
        None => Err(ScanError::new(ErrorCode::Eof, src.len())),
        Some(b'-' | b'0'..=b'9') => Ok(()),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, pos)),
    }
}

/// Integer digits at `pos`, refusing a following fraction or exponent.
fn integral(src: &[u8], pos: usize) -> Result<(Range<usize>, usize)> {
    let end = int_part(src, pos)?;
    if let Some(b'.' | b'e' | b'E') = src.get(end) {
        return Err(ScanError::new(ErrorCode::InvalidChar, end));
    }
    Ok((pos..end, end))
}

fn digits_end(src: &[u8], from: usize) -> usize {
    let mut pos = from;
    while src.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

/// End of the `0|[1-9][0-9]*` run at `pos`.
fn int_part(src: &[u8], pos: usize) -> Result<usize> {
    match src.get(pos) {
        Some(b'0') if src.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
            Err(ScanError::new(ErrorCode::NumberFormat, pos + 1))
        }
        Some(b'0') => Ok(pos + 1),
        Some(b'1'..=b'9') => Ok(digits_end(src, pos + 1)),
        _ => Err(ScanError::new(ErrorCode::NumberFormat, pos)),
    }
}

/// Splits the token at `start` into its parts, validating the grammar.
pub(crate) fn lex(src: &[u8], start: usize) -> Result<Lexeme> {
    let neg = src.get(start) == Some(&b'-');
    let int_start = start + usize::from(neg);
    let int_end = int_part(src, int_start)?;

    let mut end = int_end;
    let mut frac = end..end;
    let mut float = false;
    if src.get(end) == Some(&b'.') {
        let from = end + 1;
        end = digits_end(src, from);
        if end == from {
            return Err(ScanError::new(ErrorCode::NumberFormat, from));
        }
        frac = from..end;
        float = true;
    }

    let mut exp = 0i64;
    if let Some(b'e' | b'E') = src.get(end) {
        let mut from = end + 1;
        let exp_neg = src.get(from) == Some(&b'-');
        if let Some(b'+' | b'-') = src.get(from) {
            from += 1;
        }
        end = digits_end(src, from);
        if end == from {
            return Err(ScanError::new(ErrorCode::NumberFormat, from));
        }
        for &d in &src[from..end] {
            exp = (exp * 10 + i64::from(d - b'0')).min(EXP_LIMIT);
        }
        if exp_neg {
            exp = -exp;
        }
        float = true;
    }

    Ok(Lexeme {
        neg,
        int: int_start..int_end,
        frac,
        exp,
        float,
        end,
    })
}

fn magnitude(src: &[u8], digits: Range<usize>) -> Option<u64> {
    src[digits].iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })
}

fn apply_sign(neg: bool, magnitude: u64) -> Option<i64> {
    if neg {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn to_f64(src: &[u8], start: usize, lx: &Lexeme) -> Result<f64> {
    if let Some(value) = exact(src, lx) {
        return Ok(value);
    }
    let value = f64::from_lexical(&src[start..lx.end])
        .map_err(|_| ScanError::new(ErrorCode::NumberFormat, start))?;
    if value.is_finite() {
        Ok(value)
    } else {
        log::debug!("number at offset {start} overflows f64");
        Err(ScanError::new(ErrorCode::Overflow, start))
    }
}

/// Conversion for tokens whose significand and power of ten are both exact
/// doubles; one correctly rounded operation then gives the exact result.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn exact(src: &[u8], lx: &Lexeme) -> Option<f64> {
    let int = &src[lx.int.clone()];
    let (int, skip) = if int == b"0" {
        (&int[..0], lzero(src, lx.frac.start).min(lx.frac.len()))
    } else {
        (int, 0)
    };
    let frac = &src[lx.frac.start + skip..lx.frac.end];
    if int.len() + frac.len() > 19 {
        return None;
    }

    let mantissa = int
        .iter()
        .chain(frac)
        .fold(0u64, |acc, &d| acc * 10 + u64::from(d - b'0'));
    let sign = if lx.neg { -1.0 } else { 1.0 };
    if mantissa == 0 {
        return Some(sign * 0.0);
    }
    if mantissa > MAX_EXACT_MANTISSA {
        return None;
    }

    let exp10 = lx.exp - lx.frac.len() as i64;
    let scale = *POW10.get(usize::try_from(exp10.unsigned_abs()).ok()?)?;
    let value = mantissa as f64;
    Some(sign * if exp10 < 0 { value / scale } else { value * scale })
}
