//! C ABI over the [`jsonscan`] engine.
//!
//! Buffers cross the boundary as borrowed views that the engine never frees,
//! resizes or retains. A null view pointer is accepted when its length is
//! zero. Results are returned inline: a non-negative offset or count on
//! success, the negated [`ErrorCode`] on failure, with the failing input
//! offset written to the out-parameter each function documents.
//!
//! Cursors are `long` offsets. A negative cursor is rejected with
//! [`ErrorCode::InvalidChar`] at offset 0.

use core::{
    ffi::{c_char, c_int, c_long},
    slice,
};

use jsonscan::{ErrorCode, Number, ScanError, StateMachine, UnquoteFlags, Value, ValueKind};

/// A borrowed read-only view.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawStr {
    /// First byte.
    pub buf: *const u8,
    /// Number of readable bytes.
    pub len: usize,
}

impl RawStr {
    /// A view of `src`, valid as long as `src` is.
    #[must_use]
    pub fn new(src: &[u8]) -> Self {
        Self {
            buf: src.as_ptr(),
            len: src.len(),
        }
    }

    /// # Safety
    ///
    /// `buf` must be valid for reads of `len` bytes for `'a`, or `len` must
    /// be zero.
    unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        unsafe { bytes(self.buf, self.len) }
    }
}

/// A borrowed writable view. Bytes `len..cap` are free space.
#[repr(C)]
#[derive(Debug)]
pub struct RawSlice {
    /// First byte.
    pub buf: *mut u8,
    /// Bytes in use.
    pub len: usize,
    /// Writable bytes in total.
    pub cap: usize,
}

/// Decoded number: `t` is the value-kind tag, or a negated error code.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsonNumber {
    /// `V_DOUBLE`, `V_INTEGER`, or `-code`.
    pub t: c_long,
    /// Payload for `V_DOUBLE`.
    pub d: f64,
    /// Payload for `V_INTEGER`.
    pub i: i64,
}

/// Outcome of the classifier and lexers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsonState {
    /// Value-kind tag, or `-code` on failure.
    pub vt: c_long,
    /// Payload for doubles.
    pub dv: f64,
    /// Payload for integers; content start for strings.
    pub iv: i64,
    /// For strings the first backslash, or -1; on failure the error offset;
    /// otherwise the first byte of the value.
    pub ep: i64,
}

impl JsonState {
    fn error(e: ScanError) -> Self {
        Self {
            vt: code(e.code),
            ep: wide(e.pos),
            ..Self::default()
        }
    }

    fn scanned(value: Value, start: usize) -> Self {
        let mut st = Self {
            vt: tag(value.kind()),
            ep: wide(start),
            ..Self::default()
        };
        match value {
            Value::String(span) => {
                st.iv = wide(span.start);
                st.ep = span.escape.map_or(-1, wide);
            }
            Value::Double(d) => st.dv = d,
            Value::Integer(i) => st.iv = i,
            _ => {}
        }
        st
    }
}

impl From<Number> for JsonNumber {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(i) => Self {
                t: tag(ValueKind::Integer),
                i,
                ..Self::default()
            },
            Number::Double(d) => Self {
                t: tag(ValueKind::Double),
                d,
                ..Self::default()
            },
        }
    }
}

/// # Safety
///
/// `buf` must be valid for reads of `len` bytes for `'a`, or `len` must be
/// zero.
unsafe fn bytes<'a>(buf: *const u8, len: usize) -> &'a [u8] {
    if buf.is_null() || len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(buf, len) }
    }
}

/// # Safety
///
/// `buf` must be valid for reads and writes of `len` bytes for `'a` and not
/// aliased elsewhere, or `len` must be zero.
unsafe fn bytes_mut<'a>(buf: *mut u8, len: usize) -> &'a mut [u8] {
    if buf.is_null() || len == 0 {
        &mut []
    } else {
        unsafe { slice::from_raw_parts_mut(buf, len) }
    }
}

fn code(code: ErrorCode) -> c_long {
    c_long::try_from(code.as_raw()).unwrap_or(c_long::MIN)
}

fn status(code: ErrorCode) -> isize {
    isize::try_from(code.as_raw()).unwrap_or(isize::MIN)
}

fn tag(kind: ValueKind) -> c_long {
    c_long::try_from(kind.as_raw()).unwrap_or(c_long::MIN)
}

fn offset(n: usize) -> c_long {
    c_long::try_from(n).unwrap_or(c_long::MAX)
}

fn wide(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

fn byte(ch: c_char) -> u8 {
    u8::from_ne_bytes(ch.to_ne_bytes())
}

fn cursor(p: c_long) -> Result<usize, ScanError> {
    usize::try_from(p).map_err(|_| {
        log::debug!("rejecting negative cursor {p}");
        ScanError {
            code: ErrorCode::InvalidChar,
            pos: 0,
        }
    })
}

/// Writes the shortest round-tripping text of `val`, returning its length.
///
/// # Safety
///
/// `out` must be valid for writes of 24 bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn f64toa(out: *mut u8, val: f64) -> c_int {
    let out = unsafe { &mut *out.cast::<[u8; 24]>() };
    c_int::try_from(jsonscan::f64toa(out, val)).unwrap_or(c_int::MAX)
}

/// Writes `val` in decimal, returning its length.
///
/// # Safety
///
/// `out` must be valid for writes of 20 bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn i64toa(out: *mut u8, val: i64) -> c_int {
    let out = unsafe { &mut *out.cast::<[u8; 20]>() };
    c_int::try_from(jsonscan::i64toa(out, val)).unwrap_or(c_int::MAX)
}

/// Writes `val` in decimal, returning its length.
///
/// # Safety
///
/// `out` must be valid for writes of 20 bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn u64toa(out: *mut u8, val: u64) -> c_int {
    let out = unsafe { &mut *out.cast::<[u8; 20]>() };
    c_int::try_from(jsonscan::u64toa(out, val)).unwrap_or(c_int::MAX)
}

/// Number of ASCII `'0'` bytes at the start of the view.
///
/// # Safety
///
/// `p` must be valid for reads of `n` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lzero(p: *const u8, n: usize) -> usize {
    jsonscan::lzero(unsafe { bytes(p, n) }, 0)
}

/// Offset of the next unescaped quote at or after `p`, or -1.
///
/// # Safety
///
/// `s` must point to a valid view.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lquote(s: *const RawStr, p: usize) -> isize {
    let src = unsafe { (*s).as_bytes() };
    jsonscan::lquote(src, p).map_or(-1, signed)
}

/// Offset of the first non-whitespace byte at or after `p`.
///
/// # Safety
///
/// `sp` must be valid for reads of `nb` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lspace(sp: *const u8, nb: usize, p: usize) -> usize {
    jsonscan::lspace(unsafe { bytes(sp, nb) }, p)
}

/// Decodes the string body at `sp` (just after its opening quote, `nb`
/// bytes available) into `dp`. Decodes in place when `sp == dp`.
///
/// Returns the number of bytes written, or `-code` with the failing offset
/// in `*ep`.
///
/// # Safety
///
/// `sp` must be valid for reads of `nb` bytes and `dp` for writes of `nb`
/// bytes. The two regions must be identical or disjoint. `ep` must be valid
/// for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn unquote(
    sp: *const u8,
    nb: isize,
    dp: *mut u8,
    ep: *mut isize,
    flags: u64,
) -> isize {
    let len = usize::try_from(nb).unwrap_or(0);
    let flags = UnquoteFlags::from_bits_truncate(flags);
    let result = if core::ptr::eq(sp, dp.cast_const()) {
        jsonscan::unquote_in_place(unsafe { bytes_mut(dp, len) }, flags)
    } else {
        let src = unsafe { bytes(sp, len) };
        jsonscan::unquote(src, unsafe { bytes_mut(dp, len) }, flags)
    };
    match result {
        Ok(out) => signed(out.len),
        Err(e) => {
            unsafe { *ep = signed(e.pos) };
            status(e.code)
        }
    }
}

/// Decodes the string body in `src` (just after its opening quote) into the
/// free space of `dst`, growing `dst.len`.
///
/// Returns the number of bytes appended, or `-code` with the failing offset
/// in `*ep`. A full destination fails with [`ErrorCode::Eof`] and leaves
/// `dst.len` unchanged; retry with more capacity.
///
/// # Safety
///
/// `src` and `dst` must point to valid, non-overlapping views and `ep` must
/// be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn unquote_into(
    src: *const RawStr,
    dst: *mut RawSlice,
    ep: *mut isize,
    flags: u64,
) -> isize {
    let (src, dst) = unsafe { ((*src).as_bytes(), &mut *dst) };
    let used = dst.len.min(dst.cap);
    let full = unsafe { bytes_mut(dst.buf, dst.cap) };
    let flags = UnquoteFlags::from_bits_truncate(flags);
    match jsonscan::unquote(src, &mut full[used..], flags) {
        Ok(out) => {
            dst.len = used + out.len;
            signed(out.len)
        }
        Err(e) => {
            unsafe { *ep = signed(e.pos) };
            status(e.code)
        }
    }
}

/// Offset of the next `ch` at or after `p`, or -1.
///
/// # Safety
///
/// `s` must point to a valid view.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strchr1(s: *const RawStr, p: usize, ch: c_char) -> isize {
    let src = unsafe { (*s).as_bytes() };
    jsonscan::strchr1(src, p, byte(ch)).map_or(-1, signed)
}

/// Offset of the next `c0` or `c1` at or after `p`, or -1.
///
/// # Safety
///
/// `s` must point to a valid view.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strchr2(s: *const RawStr, p: usize, c0: c_char, c1: c_char) -> isize {
    let src = unsafe { (*s).as_bytes() };
    jsonscan::strchr2(src, p, byte(c0), byte(c1)).map_or(-1, signed)
}

/// Classifies the value at `p` (after whitespace) into `*ret`.
///
/// Returns the offset after the value, or `-code` with the failing offset in
/// `ret.ep`.
///
/// # Safety
///
/// `s` must be valid for reads of `n` bytes and `ret` for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn value(s: *const u8, n: usize, p: c_long, ret: *mut JsonState) -> c_long {
    let (src, ret) = unsafe { (bytes(s, n), &mut *ret) };
    match cursor(p).and_then(|pos| jsonscan::value(src, pos)) {
        Ok(scanned) => {
            *ret = JsonState::scanned(scanned.value, scanned.start);
            offset(scanned.end)
        }
        Err(e) => {
            *ret = JsonState::error(e);
            code(e.code)
        }
    }
}

/// Runs a lexer at `*p`, advancing it on success and describing the outcome
/// in `*ret`.
///
/// # Safety
///
/// All pointers must be valid; `src` must point to a valid view.
unsafe fn lex_into(
    src: *const RawStr,
    p: *mut c_long,
    ret: *mut JsonState,
    lex: impl FnOnce(&[u8], &mut usize) -> Result<JsonState, ScanError>,
) {
    let (src, p, ret) = unsafe { ((*src).as_bytes(), &mut *p, &mut *ret) };
    let result = cursor(*p).and_then(|mut pos| lex(src, &mut pos).map(|st| (st, pos)));
    match result {
        Ok((st, end)) => {
            *ret = st;
            *p = offset(end);
        }
        Err(e) => *ret = JsonState::error(e),
    }
}

/// Locates the string whose content starts at `*p`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `ret` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vstring(src: *const RawStr, p: *mut c_long, ret: *mut JsonState) {
    unsafe {
        lex_into(src, p, ret, |s, pos| {
            let span = jsonscan::vstring(s, pos)?;
            Ok(JsonState::scanned(Value::String(span), span.start))
        });
    }
}

/// Lexes the number at `*p`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `ret` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vnumber(src: *const RawStr, p: *mut c_long, ret: *mut JsonState) {
    unsafe {
        lex_into(src, p, ret, |s, pos| {
            let start = *pos;
            let n = jsonscan::vnumber(s, pos)?;
            Ok(JsonState::scanned(n.into(), start))
        });
    }
}

/// Lexes the integer at `*p` into `ret.iv`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `ret` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vsigned(src: *const RawStr, p: *mut c_long, ret: *mut JsonState) {
    unsafe {
        lex_into(src, p, ret, |s, pos| {
            let start = *pos;
            let i = jsonscan::vsigned(s, pos)?;
            Ok(JsonState::scanned(Value::Integer(i), start))
        });
    }
}

/// Lexes the non-negative integer at `*p` into `ret.iv`, bit-cast from
/// `u64`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `ret` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vunsigned(src: *const RawStr, p: *mut c_long, ret: *mut JsonState) {
    unsafe {
        lex_into(src, p, ret, |s, pos| {
            let start = *pos;
            let u = jsonscan::vunsigned(s, pos)?;
            let bits = i64::from_ne_bytes(u.to_ne_bytes());
            Ok(JsonState::scanned(Value::Integer(bits), start))
        });
    }
}

/// Lexes the number at `p` into `*ret`.
///
/// Returns the offset after the number, or `-code` (also stored in
/// `ret.t`).
///
/// # Safety
///
/// `src` must point to a valid view and `ret` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn number(src: *const RawStr, p: c_long, ret: *mut JsonNumber) -> c_long {
    let (src, ret) = unsafe { ((*src).as_bytes(), &mut *ret) };
    let result = cursor(p).and_then(|mut pos| jsonscan::vnumber(src, &mut pos).map(|n| (n, pos)));
    match result {
        Ok((n, end)) => {
            *ret = n.into();
            offset(end)
        }
        Err(e) => {
            *ret = JsonNumber {
                t: code(e.code),
                ..JsonNumber::default()
            };
            code(e.code)
        }
    }
}

/// Runs a skip function at `*p`: on success moves `*p` past the value and
/// returns its start, otherwise stores the failing offset in `*p` and
/// returns `-code`.
///
/// # Safety
///
/// `src` must point to a valid view and `p` must be valid.
unsafe fn skip_with(
    src: *const RawStr,
    p: *mut c_long,
    skip: impl FnOnce(&[u8], &mut usize) -> Result<usize, ScanError>,
) -> c_long {
    let (src, p) = unsafe { ((*src).as_bytes(), &mut *p) };
    let result = cursor(*p).and_then(|mut pos| skip(src, &mut pos).map(|start| (start, pos)));
    match result {
        Ok((start, end)) => {
            *p = offset(end);
            offset(start)
        }
        Err(e) => {
            *p = offset(e.pos);
            code(e.code)
        }
    }
}

/// Skips one value at `*p`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `m` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_one(
    src: *const RawStr,
    p: *mut c_long,
    m: *mut StateMachine,
) -> c_long {
    let m = unsafe { &mut *m };
    unsafe { skip_with(src, p, |s, pos| jsonscan::skip_one(s, pos, m)) }
}

/// Skips the rest of an array whose `[` is just before `*p`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `m` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_array(
    src: *const RawStr,
    p: *mut c_long,
    m: *mut StateMachine,
) -> c_long {
    let m = unsafe { &mut *m };
    unsafe { skip_with(src, p, |s, pos| jsonscan::skip_array(s, pos, m)) }
}

/// Skips the rest of an object whose `{` is just before `*p`.
///
/// # Safety
///
/// `src` must point to a valid view; `p` and `m` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_object(
    src: *const RawStr,
    p: *mut c_long,
    m: *mut StateMachine,
) -> c_long {
    let m = unsafe { &mut *m };
    unsafe { skip_with(src, p, |s, pos| jsonscan::skip_object(s, pos, m)) }
}

/// Skips the rest of a string whose opening quote is just before `*p`.
///
/// # Safety
///
/// `src` must point to a valid view and `p` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_string(src: *const RawStr, p: *mut c_long) -> c_long {
    unsafe { skip_with(src, p, jsonscan::skip_string) }
}

/// Skips the number whose `-` is at `*p`.
///
/// # Safety
///
/// `src` must point to a valid view and `p` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_negative(src: *const RawStr, p: *mut c_long) -> c_long {
    unsafe { skip_with(src, p, jsonscan::skip_negative) }
}

/// Skips the number whose first digit is at `*p`.
///
/// # Safety
///
/// `src` must point to a valid view and `p` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn skip_positive(src: *const RawStr, p: *mut c_long) -> c_long {
    unsafe { skip_with(src, p, jsonscan::skip_positive) }
}

/// Allocates a skip state machine for hosts that do not embed one.
#[unsafe(no_mangle)]
pub extern "C" fn state_machine_new() -> *mut StateMachine {
    Box::into_raw(Box::default())
}

/// Frees a machine from [`state_machine_new`]. Null is ignored.
///
/// # Safety
///
/// `m` must come from [`state_machine_new`] and not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn state_machine_free(m: *mut StateMachine) {
    if !m.is_null() {
        drop(unsafe { Box::from_raw(m) });
    }
}
