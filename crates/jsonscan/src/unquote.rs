//! Decoding of JSON string bodies.
//!
//! [`unquote`] reads from the byte after an opening quote up to the matching
//! closing quote and writes the decoded bytes to a separate destination.
//! [`unquote_in_place`] does the same inside one buffer: every escape
//! sequence decodes to no more bytes than it occupies, so the write cursor
//! never overtakes the read cursor.
//!
//! Escape-free runs are located with a wide two-byte search and copied in
//! bulk; only escapes are handled byte by byte.
//!
//! # Surrogates
//!
//! A high surrogate escape immediately followed by a low surrogate escape is
//! combined into one supplementary code point. Any other surrogate escape is
//! unpaired: it fails with [`ErrorCode::InvalidUnicode`] unless
//! [`UnquoteFlags::UNICODE_REPLACE`] is set, in which case it decodes to
//! U+FFFD.
//!
//! # Double unquoting
//!
//! With [`UnquoteFlags::DOUBLE_UNQUOTE`] the once-decoded body is decoded a
//! second time, in place, as the body of another string. The second level
//! has no closing quote; a bare `"` in it is [`ErrorCode::InvalidChar`].
//! The surrogate policy applies to both levels, and offsets of second-level
//! errors index the once-decoded text.

use core::ops::Range;

use crate::{
    error::{ErrorCode, Result, ScanError},
    options::UnquoteFlags,
    scan::{Strategy, Wide},
};

/// Outcome of a successful [`unquote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unquoted {
    /// Number of decoded bytes written to the destination.
    pub len: usize,
    /// Offset one past the closing quote in the source.
    pub end: usize,
}

/// Decodes the string body at the start of `src` into `dst`.
///
/// `src` starts right after the opening quote; its length is the byte
/// limit. Decoding stops after the first unescaped `"`.
///
/// # Errors
///
/// - [`ErrorCode::InvalidEscape`] for an unknown character after `\`.
/// - [`ErrorCode::InvalidUnicode`] for malformed `\uXXXX` digits or an
///   unpaired surrogate (without [`UnquoteFlags::UNICODE_REPLACE`]).
/// - [`ErrorCode::Eof`] when no closing quote occurs within `src`, or when
///   `dst` is too short for the decoded bytes; the latter can be retried
///   with a larger destination. A destination as long as `src` always
///   suffices.
///
/// # Examples
///
/// ```rust
/// use jsonscan::{UnquoteFlags, unquote};
///
/// let src = br#"a\"b" trailing"#;
/// let mut dst = [0u8; 16];
/// let out = unquote(src, &mut dst, UnquoteFlags::default()).unwrap();
/// assert_eq!(&dst[..out.len], b"a\"b");
/// assert_eq!(out.end, 5);
/// ```
pub fn unquote(src: &[u8], dst: &mut [u8], flags: UnquoteFlags) -> Result<Unquoted> {
    let mut out = decode(&mut Split { src, dst }, Mode::Quoted, flags)?;
    if flags.contains(UnquoteFlags::DOUBLE_UNQUOTE) {
        let body = &mut dst[..out.len];
        out.len = decode(&mut InPlace { buf: body }, Mode::Body, flags)?.len;
    }
    Ok(out)
}

/// Like [`unquote`], but writes the decoded bytes over the start of `buf`.
///
/// Bytes of `buf` past the decoded length are left in an unspecified state.
///
/// # Errors
///
/// As for [`unquote`]; the destination can never be too short.
pub fn unquote_in_place(buf: &mut [u8], flags: UnquoteFlags) -> Result<Unquoted> {
    let mut out = decode(&mut InPlace { buf: &mut *buf }, Mode::Quoted, flags)?;
    if flags.contains(UnquoteFlags::DOUBLE_UNQUOTE) {
        let body = &mut buf[..out.len];
        out.len = decode(&mut InPlace { buf: body }, Mode::Body, flags)?.len;
    }
    Ok(out)
}

/// Where decoded bytes come from and go to.
trait Io {
    fn input(&self) -> &[u8];
    /// Copies `input()[from]` to output offset `to`.
    fn copy(&mut self, from: Range<usize>, to: usize) -> bool;
    fn put(&mut self, to: usize, bytes: &[u8]) -> bool;
}

struct Split<'a> {
    src: &'a [u8],
    dst: &'a mut [u8],
}

impl Io for Split<'_> {
    fn input(&self) -> &[u8] {
        self.src
    }

    fn copy(&mut self, from: Range<usize>, to: usize) -> bool {
        let n = from.end - from.start;
        match self.dst.get_mut(to..to + n) {
            Some(out) => {
                out.copy_from_slice(&self.src[from]);
                true
            }
            None => false,
        }
    }

    fn put(&mut self, to: usize, bytes: &[u8]) -> bool {
        match self.dst.get_mut(to..to + bytes.len()) {
            Some(out) => {
                out.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }
}

/// Output trails input inside the same buffer.
struct InPlace<'a> {
    buf: &'a mut [u8],
}

impl Io for InPlace<'_> {
    fn input(&self) -> &[u8] {
        self.buf
    }

    fn copy(&mut self, from: Range<usize>, to: usize) -> bool {
        debug_assert!(to <= from.start);
        if to != from.start {
            self.buf.copy_within(from, to);
        }
        true
    }

    fn put(&mut self, to: usize, bytes: &[u8]) -> bool {
        match self.buf.get_mut(to..to + bytes.len()) {
            Some(out) => {
                out.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ends at the first unescaped quote.
    Quoted,
    /// Ends at the end of input; quotes must be escaped.
    Body,
}

/// One decoded escape sequence.
struct Escape {
    bytes: [u8; 4],
    len: usize,
    consumed: usize,
}

impl Escape {
    fn byte(b: u8) -> Self {
        Self {
            bytes: [b, 0, 0, 0],
            len: 1,
            consumed: 2,
        }
    }

    fn char(ch: char, consumed: usize) -> Self {
        let mut bytes = [0u8; 4];
        let len = ch.encode_utf8(&mut bytes).len();
        Self {
            bytes,
            len,
            consumed,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

enum Step {
    Done(usize),
    Escape { at: usize, escape: Escape },
}

fn decode<I: Io>(io: &mut I, mode: Mode, flags: UnquoteFlags) -> Result<Unquoted> {
    let mut r = 0;
    let mut w = 0;
    loop {
        let (run_end, step) = {
            let src = io.input();
            match Wide::find_either(src, r, b'"', b'\\') {
                Some(at) if src[at] == b'\\' => (at, Some(at)),
                Some(at) if mode == Mode::Quoted => (at, None),
                Some(at) => return Err(ScanError::new(ErrorCode::InvalidChar, at)),
                None if mode == Mode::Body => (src.len(), None),
                None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
            }
        };

        if run_end > r {
            if !io.copy(r..run_end, w) {
                return Err(ScanError::new(ErrorCode::Eof, r));
            }
            w += run_end - r;
        }

        let step = match step {
            None => Step::Done(run_end),
            Some(at) => Step::Escape {
                at,
                escape: unescape(io.input(), at, flags)?,
            },
        };

        match step {
            Step::Done(at) => {
                let end = if mode == Mode::Quoted { at + 1 } else { at };
                return Ok(Unquoted { len: w, end });
            }
            Step::Escape { at, escape } => {
                if !io.put(w, escape.as_bytes()) {
                    return Err(ScanError::new(ErrorCode::Eof, at));
                }
                w += escape.len;
                r = at + escape.consumed;
            }
        }
    }
}

/// Decodes the escape sequence whose backslash is at `at`.
fn unescape(src: &[u8], at: usize, flags: UnquoteFlags) -> Result<Escape> {
    let Some(&c) = src.get(at + 1) else {
        return Err(ScanError::new(ErrorCode::Eof, src.len()));
    };
    Ok(match c {
        b'"' | b'\\' | b'/' => Escape::byte(c),
        b'b' => Escape::byte(0x08),
        b'f' => Escape::byte(0x0c),
        b'n' => Escape::byte(b'\n'),
        b'r' => Escape::byte(b'\r'),
        b't' => Escape::byte(b'\t'),
        b'u' => unicode(src, at, flags)?,
        _ => return Err(ScanError::new(ErrorCode::InvalidEscape, at)),
    })
}

fn unicode(src: &[u8], at: usize, flags: UnquoteFlags) -> Result<Escape> {
    let unit = hex4(src, at)?;
    match unit {
        0xD800..=0xDBFF => {
            let next = at + 6;
            if src.get(next) == Some(&b'\\') && src.get(next + 1) == Some(&b'u') {
                let low = hex4(src, next)?;
                if (0xDC00..=0xDFFF).contains(&low) {
                    let cp =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    let ch = char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Ok(Escape::char(ch, 12));
                }
            }
            unpaired(at, flags)
        }
        0xDC00..=0xDFFF => unpaired(at, flags),
        _ => {
            let ch = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
            Ok(Escape::char(ch, 6))
        }
    }
}

fn unpaired(at: usize, flags: UnquoteFlags) -> Result<Escape> {
    if flags.contains(UnquoteFlags::UNICODE_REPLACE) {
        log::debug!("replacing unpaired surrogate escape at offset {at}");
        Ok(Escape::char(char::REPLACEMENT_CHARACTER, 6))
    } else {
        Err(ScanError::new(ErrorCode::InvalidUnicode, at))
    }
}

/// Reads the four hex digits of the `\uXXXX` escape starting at `at`.
fn hex4(src: &[u8], at: usize) -> Result<u16> {
    let mut unit = 0u16;
    for i in at + 2..at + 6 {
        let Some(&h) = src.get(i) else {
            return Err(ScanError::new(ErrorCode::Eof, src.len()));
        };
        let digit = match h {
            b'0'..=b'9' => h - b'0',
            b'a'..=b'f' => h - b'a' + 10,
            b'A'..=b'F' => h - b'A' + 10,
            _ => return Err(ScanError::new(ErrorCode::InvalidUnicode, at)),
        };
        unit = (unit << 4) | u16::from(digit);
    }
    Ok(unit)
}
