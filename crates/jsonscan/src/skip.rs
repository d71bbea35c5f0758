//! Skipping whole values without decoding them.
//!
//! Container nesting is tracked in a caller-owned [`StateMachine`] instead of
//! the call stack, so adversarial nesting costs a bounded, fixed amount of
//! memory. Each open container occupies one frame; opening container number
//! [`MAX_RECURSE`] + 1 fails with [`ErrorCode::RecursionLimit`] before
//! anything is pushed.
//!
//! Every function returns the offset where the skipped value starts and moves
//! `*pos` one past its end. On error `*pos` is left untouched.

use core::fmt;

use crate::{
    error::{ErrorCode, Result, ScanError},
    number,
    options::{MAX_RECURSE, VS_ALSE, VS_NULL, VS_TRUE},
    scan::{lquote, lspace},
    value::literal,
};

/// Just after `[`: a value or `]`.
const ARRAY_FIRST: u8 = 1;
/// After an element: `,` or `]`.
const ARRAY: u8 = 2;
/// Just after `{`: a key or `}`.
const OBJECT_FIRST: u8 = 3;
/// After a member: `,` or `}`.
const OBJECT: u8 = 4;

/// Explicit nesting stack for the skip functions.
///
/// The layout is shared with foreign callers, which may allocate it
/// themselves; any contents are valid since every entry point resets it.
/// It is `{ size_t sp; uint8_t vt[MAX_RECURSE]; }`, which is not the
/// `{ int sp; int vt[MAX_RECURSE]; }` record of older native headers, so
/// hosts built against those must allocate through `state_machine_new`
/// or declare the new layout.
#[derive(Clone)]
#[repr(C)]
pub struct StateMachine {
    sp: usize,
    vt: [u8; MAX_RECURSE],
}

impl StateMachine {
    /// An empty machine.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sp: 0,
            vt: [0; MAX_RECURSE],
        }
    }

    /// Number of containers open when the last call returned.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.sp
    }

    fn reset(&mut self) {
        self.sp = 0;
    }

    fn push(&mut self, frame: u8, at: usize) -> Result<()> {
        let Some(slot) = self.vt.get_mut(self.sp) else {
            log::debug!("nesting deeper than {MAX_RECURSE} at offset {at}");
            return Err(ScanError::new(ErrorCode::RecursionLimit, at));
        };
        *slot = frame;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) {
        self.sp = self.sp.saturating_sub(1);
    }

    fn top(&self) -> u8 {
        self.sp
            .checked_sub(1)
            .and_then(|i| self.vt.get(i))
            .copied()
            .unwrap_or(0)
    }

    fn set_top(&mut self, frame: u8) {
        if let Some(slot) = self.sp.checked_sub(1).and_then(|i| self.vt.get_mut(i)) {
            *slot = frame;
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("depth", &self.sp)
            .finish_non_exhaustive()
    }
}

/// Skips one complete value of any kind, after leading whitespace.
///
/// # Errors
///
/// [`ErrorCode::Eof`] if the input ends inside the value,
/// [`ErrorCode::InvalidChar`] for a misplaced byte,
/// [`ErrorCode::RecursionLimit`] for excessive nesting, and the
/// number lexer's errors for malformed numbers.
///
/// # Examples
///
/// ```rust
/// use jsonscan::{StateMachine, skip_one};
///
/// let src = br#"  {"a": [1, 2, {"b": null}]}, 3"#;
/// let mut sm = Box::new(StateMachine::new());
/// let mut pos = 0;
/// assert_eq!(skip_one(src, &mut pos, &mut sm), Ok(2));
/// assert_eq!(&src[pos..], b", 3");
/// ```
pub fn skip_one(src: &[u8], pos: &mut usize, sm: &mut StateMachine) -> Result<usize> {
    log::trace!("skip_one at offset {}", *pos);
    sm.reset();
    let start = lspace(src, *pos);
    let end = drive(src, start, sm, true)?;
    *pos = end;
    Ok(start)
}

/// Skips the rest of an array whose `[` has already been consumed.
///
/// Returns the offset of that `[`.
///
/// # Errors
///
/// As for [`skip_one`].
pub fn skip_array(src: &[u8], pos: &mut usize, sm: &mut StateMachine) -> Result<usize> {
    log::trace!("skip_array at offset {}", *pos);
    skip_container(src, pos, sm, ARRAY_FIRST)
}

/// Skips the rest of an object whose `{` has already been consumed.
///
/// Returns the offset of that `{`.
///
/// # Errors
///
/// As for [`skip_one`].
pub fn skip_object(src: &[u8], pos: &mut usize, sm: &mut StateMachine) -> Result<usize> {
    log::trace!("skip_object at offset {}", *pos);
    skip_container(src, pos, sm, OBJECT_FIRST)
}

fn skip_container(src: &[u8], pos: &mut usize, sm: &mut StateMachine, frame: u8) -> Result<usize> {
    let from = (*pos).min(src.len());
    let start = from.saturating_sub(1);
    sm.reset();
    sm.push(frame, start)?;
    let end = drive(src, from, sm, false)?;
    *pos = end;
    Ok(start)
}

/// Skips the rest of a string whose opening quote has been consumed.
///
/// Returns the offset of that quote. Escapes are stepped over, not checked.
///
/// # Errors
///
/// [`ErrorCode::Eof`] when the closing quote is missing.
pub fn skip_string(src: &[u8], pos: &mut usize) -> Result<usize> {
    let start = pos.saturating_sub(1);
    let close = lquote(src, *pos).ok_or(ScanError::new(ErrorCode::Eof, src.len()))?;
    *pos = close + 1;
    Ok(start)
}

/// Skips a number token whose `-` sign is at `*pos`.
///
/// # Errors
///
/// [`ErrorCode::InvalidChar`] if `*pos` is not at `-`, otherwise the number
/// grammar errors.
pub fn skip_negative(src: &[u8], pos: &mut usize) -> Result<usize> {
    let start = *pos;
    match src.get(start) {
        Some(b'-') => skip_number(src, pos),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, start)),
        None => Err(ScanError::new(ErrorCode::Eof, src.len())),
    }
}

/// Skips an unsigned number token whose first digit is at `*pos`.
///
/// # Errors
///
/// [`ErrorCode::InvalidChar`] if `*pos` is not at a digit, otherwise the
/// number grammar errors.
pub fn skip_positive(src: &[u8], pos: &mut usize) -> Result<usize> {
    let start = *pos;
    match src.get(start) {
        Some(b'0'..=b'9') => skip_number(src, pos),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, start)),
        None => Err(ScanError::new(ErrorCode::Eof, src.len())),
    }
}

fn skip_number(src: &[u8], pos: &mut usize) -> Result<usize> {
    let start = *pos;
    *pos = number::lex(src, start)?.end;
    Ok(start)
}

/// Skips the scalar at `at`, returning its end.
fn scalar(src: &[u8], at: usize) -> Result<usize> {
    match src.get(at) {
        None => Err(ScanError::new(ErrorCode::Eof, at)),
        Some(b'"') => lquote(src, at + 1)
            .map(|close| close + 1)
            .ok_or(ScanError::new(ErrorCode::Eof, src.len())),
        Some(b'n') => literal(src, at, at, VS_NULL),
        Some(b't') => literal(src, at, at, VS_TRUE),
        Some(b'f') => literal(src, at, at + 1, VS_ALSE),
        Some(b'-' | b'0'..=b'9') => Ok(number::lex(src, at)?.end),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, at)),
    }
}

/// Skips an object key at `at` (its opening quote) and the colon after it,
/// returning the offset after the colon.
fn member_key(src: &[u8], at: usize) -> Result<usize> {
    let key_end = scalar(src, at)?;
    let colon = lspace(src, key_end);
    match src.get(colon) {
        Some(b':') => Ok(colon + 1),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, colon)),
        None => Err(ScanError::new(ErrorCode::Eof, colon)),
    }
}

/// Runs the machine from `p` until its stack empties, returning the end
/// offset. With `want_value` the next token must be a value.
fn drive(src: &[u8], mut p: usize, sm: &mut StateMachine, mut want_value: bool) -> Result<usize> {
    loop {
        if want_value {
            want_value = false;
            let at = lspace(src, p);
            match src.get(at) {
                Some(b'[') => {
                    sm.push(ARRAY_FIRST, at)?;
                    p = at + 1;
                    continue;
                }
                Some(b'{') => {
                    sm.push(OBJECT_FIRST, at)?;
                    p = at + 1;
                    continue;
                }
                _ => p = scalar(src, at)?,
            }
            if sm.depth() == 0 {
                return Ok(p);
            }
        }

        let at = lspace(src, p);
        let Some(&c) = src.get(at) else {
            return Err(ScanError::new(ErrorCode::Eof, at));
        };
        match (sm.top(), c) {
            (ARRAY_FIRST | ARRAY, b']') | (OBJECT_FIRST | OBJECT, b'}') => {
                sm.pop();
                p = at + 1;
                if sm.depth() == 0 {
                    return Ok(p);
                }
            }
            (ARRAY_FIRST, _) => {
                sm.set_top(ARRAY);
                p = at;
                want_value = true;
            }
            (ARRAY, b',') => {
                p = at + 1;
                want_value = true;
            }
            (OBJECT_FIRST, b'"') => {
                sm.set_top(OBJECT);
                p = member_key(src, at)?;
                want_value = true;
            }
            (OBJECT, b',') => {
                let key = lspace(src, at + 1);
                match src.get(key) {
                    Some(b'"') => p = member_key(src, key)?,
                    Some(_) => return Err(ScanError::new(ErrorCode::InvalidChar, key)),
                    None => return Err(ScanError::new(ErrorCode::Eof, key)),
                }
                want_value = true;
            }
            _ => return Err(ScanError::new(ErrorCode::InvalidChar, at)),
        }
    }
}
