//! Allocation-free scanning primitives for JSON text.
//!
//! Every function works on a borrowed byte buffer and a cursor offset. There
//! is no parse tree: callers classify the value under the cursor with
//! [`value`], step over whole values with the `skip_*` family, and decode
//! string bodies with [`unquote`] only when they need the bytes.
//!
//! ```rust
//! use jsonscan::{StateMachine, Value, skip_one, strchr1, value};
//!
//! let src = br#"{"skip": [1, 2, {"deep": true}], "keep": 7}"#;
//! let mut sm = Box::new(StateMachine::new());
//!
//! // Step over the first member's value without decoding it.
//! let mut pos = 9;
//! skip_one(src, &mut pos, &mut sm).unwrap();
//! assert_eq!(&src[pos..pos + 2], b", ");
//!
//! let colon = strchr1(src, pos, b':').unwrap();
//! let scanned = value(src, colon + 1).unwrap();
//! assert_eq!(scanned.value, Value::Integer(7));
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

mod error;
mod format;
mod number;
mod options;
pub mod scan;
mod skip;
mod unquote;
mod value;

pub use error::{ErrorCode, ScanError};
pub use format::{f64toa, i64toa, u64toa};
pub use number::{Number, vnumber, vsigned, vunsigned};
pub use options::{MAX_RECURSE, UnquoteFlags, VS_ALSE, VS_NULL, VS_TRUE};
pub use scan::{lquote, lspace, lzero, strchr1, strchr2};
pub use skip::{
    StateMachine, skip_array, skip_negative, skip_object, skip_one, skip_positive, skip_string,
};
pub use unquote::{Unquoted, unquote, unquote_in_place};
pub use value::{Scanned, StringSpan, Value, ValueKind, value, vstring};
