use bstr::BStr;
use thiserror::Error;

/// Failure classes reported by every scanning entry point.
///
/// The discriminants are part of the foreign ABI: a failed call returns the
/// negated discriminant (see [`ErrorCode::as_raw`]).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i64)]
pub enum ErrorCode {
    /// The buffer ended before a complete token was read.
    #[error("unexpected end of input")]
    Eof = 1,
    /// A byte that cannot appear at this position.
    #[error("invalid character")]
    InvalidChar = 2,
    /// An unknown character after a backslash.
    #[error("invalid escape sequence")]
    InvalidEscape = 3,
    /// Malformed `\uXXXX` digits or a broken surrogate pair.
    #[error("invalid unicode escape sequence")]
    InvalidUnicode = 4,
    /// The number does not fit the requested representation.
    #[error("number out of range")]
    Overflow = 5,
    /// The number violates the JSON number grammar.
    #[error("invalid number format")]
    NumberFormat = 6,
    /// Containers nested deeper than [`MAX_RECURSE`](crate::MAX_RECURSE).
    #[error("recursion limit exceeded")]
    RecursionLimit = 7,
}

impl ErrorCode {
    /// The negative sentinel returned across the foreign boundary.
    #[must_use]
    pub const fn as_raw(self) -> i64 {
        -(self as i64)
    }

    /// Inverse of [`ErrorCode::as_raw`]. Accepts either sign.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        Some(match raw.unsigned_abs() {
            1 => Self::Eof,
            2 => Self::InvalidChar,
            3 => Self::InvalidEscape,
            4 => Self::InvalidUnicode,
            5 => Self::Overflow,
            6 => Self::NumberFormat,
            7 => Self::RecursionLimit,
            _ => return None,
        })
    }
}

/// An [`ErrorCode`] together with the input offset where it was detected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{code} at offset {pos}")]
pub struct ScanError {
    /// What went wrong.
    pub code: ErrorCode,
    /// Offset into the scanned buffer.
    pub pos: usize,
}

/// Bytes of context shown on each side of the error offset.
const SNIPPET_RADIUS: usize = 16;

impl ScanError {
    pub(crate) const fn new(code: ErrorCode, pos: usize) -> Self {
        Self { code, pos }
    }

    /// Returns a short window of `src` around the error offset, for
    /// diagnostics. `src` must be the buffer the error was produced from;
    /// offsets past its end are clamped.
    #[must_use]
    pub fn snippet<'a>(&self, src: &'a [u8]) -> &'a BStr {
        let at = self.pos.min(src.len());
        let lo = at.saturating_sub(SNIPPET_RADIUS);
        let hi = at.saturating_add(SNIPPET_RADIUS).min(src.len());
        BStr::new(&src[lo..hi])
    }
}

pub(crate) type Result<T> = core::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ErrorCode::Eof, -1)]
    #[case(ErrorCode::InvalidChar, -2)]
    #[case(ErrorCode::InvalidEscape, -3)]
    #[case(ErrorCode::InvalidUnicode, -4)]
    #[case(ErrorCode::Overflow, -5)]
    #[case(ErrorCode::NumberFormat, -6)]
    #[case(ErrorCode::RecursionLimit, -7)]
    fn raw_codes_are_stable(#[case] code: ErrorCode, #[case] raw: i64) {
        assert_eq!(code.as_raw(), raw);
        assert_eq!(ErrorCode::from_raw(raw), Some(code));
        assert_eq!(ErrorCode::from_raw(-raw), Some(code));
    }

    #[test]
    fn unknown_raw_codes() {
        assert_eq!(ErrorCode::from_raw(0), None);
        assert_eq!(ErrorCode::from_raw(-8), None);
        assert_eq!(ErrorCode::from_raw(i64::MIN), None);
    }

    #[test]
    fn display() {
        let err = ScanError::new(ErrorCode::NumberFormat, 3);
        insta::assert_snapshot!(err.to_string(), @"invalid number format at offset 3");
    }

    #[test]
    fn snippet_is_clamped() {
        let src = b"[1, 2, tru";
        let err = ScanError::new(ErrorCode::Eof, 7);
        assert_eq!(err.snippet(src), BStr::new(&src[..]));

        let long = [b'a'; 64];
        let err = ScanError::new(ErrorCode::InvalidChar, 40);
        assert_eq!(err.snippet(&long).len(), 2 * SNIPPET_RADIUS);

        let err = ScanError::new(ErrorCode::Eof, 1000);
        assert_eq!(err.snippet(&long).len(), SNIPPET_RADIUS);
    }
}
