//! Classification of the value that starts at a cursor.
//!
//! The classifier never descends into containers: an opening bracket or
//! brace is reported as [`Value::Array`] or [`Value::Object`] and the caller
//! iterates the members. Scalars are fully lexed.

use crate::{
    error::{ErrorCode, Result, ScanError},
    number::{Number, vnumber},
    options::{VS_ALSE, VS_NULL, VS_TRUE},
    scan::{Strategy, Wide, lquote, lspace},
};

/// The closed set of value kinds, with their foreign tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i64)]
pub enum ValueKind {
    /// Only whitespace remained.
    Eof = 1,
    /// `null`
    Null = 2,
    /// `true`
    True = 3,
    /// `false`
    False = 4,
    /// An opening `[`.
    Array = 5,
    /// An opening `{`.
    Object = 6,
    /// A string.
    String = 7,
    /// A floating number.
    Double = 8,
    /// An integral number that fits `i64`.
    Integer = 9,
}

impl ValueKind {
    /// The tag used at the foreign boundary.
    #[must_use]
    pub const fn as_raw(self) -> i64 {
        self as i64
    }
}

/// Location of a string's content inside the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringSpan {
    /// First content byte, just after the opening quote.
    pub start: usize,
    /// Offset of the closing quote.
    pub end: usize,
    /// Offset of the first backslash, if any. Without one the content can be
    /// borrowed as-is; otherwise it must go through [`unquote`](crate::unquote()).
    pub escape: Option<usize>,
}

impl StringSpan {
    /// The raw, still escaped, content bytes.
    #[must_use]
    pub fn raw<'a>(&self, src: &'a [u8]) -> &'a [u8] {
        &src[self.start..self.end]
    }
}

/// A classified value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Only whitespace remained.
    Eof,
    /// `null`
    Null,
    /// `true`
    True,
    /// `false`
    False,
    /// An array starts here.
    Array,
    /// An object starts here.
    Object,
    /// A string.
    String(StringSpan),
    /// A floating number.
    Double(f64),
    /// An integral number.
    Integer(i64),
}

impl Value {
    /// The tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Eof => ValueKind::Eof,
            Self::Null => ValueKind::Null,
            Self::True => ValueKind::True,
            Self::False => ValueKind::False,
            Self::Array => ValueKind::Array,
            Self::Object => ValueKind::Object,
            Self::String(_) => ValueKind::String,
            Self::Double(_) => ValueKind::Double,
            Self::Integer(_) => ValueKind::Integer,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(i) => Self::Integer(i),
            Number::Double(d) => Self::Double(d),
        }
    }
}

/// A classified value and its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scanned {
    /// What was found.
    pub value: Value,
    /// First byte of the value, after leading whitespace. For numbers,
    /// `src[start..end]` is the token text.
    pub start: usize,
    /// One past the consumed bytes. For containers this is just past the
    /// opening delimiter.
    pub end: usize,
}

/// Skips whitespace at `pos` and classifies the value found there.
///
/// Reaching the end of `src` after whitespace is not an error; it yields
/// [`Value::Eof`].
///
/// # Errors
///
/// - [`ErrorCode::InvalidChar`] for a byte that cannot start a value,
///   including `]`, `}`, `,` and `:`.
/// - [`ErrorCode::Eof`] for a truncated literal or an unterminated string.
/// - Any error of [`vnumber`] for numbers.
///
/// # Examples
///
/// ```rust
/// use jsonscan::{Value, value};
///
/// let src = b"  true, null";
/// let first = value(src, 0).unwrap();
/// assert_eq!(first.value, Value::True);
/// assert_eq!((first.start, first.end), (2, 6));
/// ```
pub fn value(src: &[u8], pos: usize) -> Result<Scanned> {
    let start = lspace(src, pos);
    let Some(&first) = src.get(start) else {
        return Ok(Scanned {
            value: Value::Eof,
            start,
            end: start,
        });
    };

    let (value, end) = match first {
        b'[' => (Value::Array, start + 1),
        b'{' => (Value::Object, start + 1),
        b'"' => {
            let mut end = start + 1;
            let span = vstring(src, &mut end)?;
            (Value::String(span), end)
        }
        b'n' => (Value::Null, literal(src, start, start, VS_NULL)?),
        b't' => (Value::True, literal(src, start, start, VS_TRUE)?),
        b'f' => (Value::False, literal(src, start, start + 1, VS_ALSE)?),
        b'-' | b'0'..=b'9' => {
            let mut end = start;
            let n = vnumber(src, &mut end)?;
            (n.into(), end)
        }
        _ => return Err(ScanError::new(ErrorCode::InvalidChar, start)),
    };
    Ok(Scanned { value, start, end })
}

/// Locates the end of the string whose content starts at `*pos`.
///
/// On success `*pos` is moved one past the closing quote. Escapes are not
/// validated here.
///
/// # Errors
///
/// [`ErrorCode::Eof`] at `src.len()` when the closing quote is missing.
pub fn vstring(src: &[u8], pos: &mut usize) -> Result<StringSpan> {
    let start = *pos;
    let missing = || ScanError::new(ErrorCode::Eof, src.len());

    let first = Wide::find_either(src, start, b'"', b'\\').ok_or_else(missing)?;
    let (end, escape) = if src[first] == b'"' {
        (first, None)
    } else {
        (lquote(src, first).ok_or_else(missing)?, Some(first))
    };

    *pos = end + 1;
    Ok(StringSpan { start, end, escape })
}

/// Matches the four bytes at `at` against a little-endian literal pattern.
/// Errors point at `start`, the literal's first byte.
pub(crate) fn literal(src: &[u8], start: usize, at: usize, pattern: u32) -> Result<usize> {
    match src.get(at..at + 4) {
        Some(&[a, b, c, d]) if u32::from_le_bytes([a, b, c, d]) == pattern => Ok(at + 4),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, start)),
        None => {
            let tail = src.get(at..).unwrap_or_default();
            let code = if pattern.to_le_bytes().starts_with(tail) {
                ErrorCode::Eof
            } else {
                ErrorCode::InvalidChar
            };
            Err(ScanError::new(code, start))
        }
    }
}
