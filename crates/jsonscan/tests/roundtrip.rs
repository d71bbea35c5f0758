#![allow(missing_docs)]

mod common;

use common::tests;
use jsonscan::{
    ErrorCode, Number, ScanError, StringSpan, UnquoteFlags, Value, f64toa, i64toa, u64toa,
    unquote, value, vnumber, vsigned, vunsigned,
};
use quickcheck::QuickCheck;
use rstest::rstest;

/// Property: integers formatted to text lex back as the same integer.
#[test]
fn integers_roundtrip() {
    fn prop(signed: i64, unsigned: u64) -> bool {
        let mut out = [0u8; 20];
        let n = i64toa(&mut out, signed);
        let text = &out[..n];
        let (mut p1, mut p2) = (0, 0);
        let as_number = vnumber(text, &mut p1) == Ok(Number::Integer(signed)) && p1 == n;
        let as_signed = vsigned(text, &mut p2) == Ok(signed) && p2 == n;

        let n = u64toa(&mut out, unsigned);
        let mut p3 = 0;
        let as_unsigned = vunsigned(&out[..n], &mut p3) == Ok(unsigned) && p3 == n;

        as_number && as_signed && as_unsigned
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(i64, u64) -> bool);
}

/// Property: doubles formatted to text lex back as a double with the same
/// bits.
#[test]
fn doubles_roundtrip() {
    fn prop(val: f64) -> bool {
        if !val.is_finite() {
            return true;
        }
        let mut out = [0u8; 24];
        let n = f64toa(&mut out, val);
        let mut pos = 0;
        match vnumber(&out[..n], &mut pos) {
            Ok(Number::Double(d)) => d.to_bits() == val.to_bits() && pos == n,
            _ => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(f64) -> bool);
}

#[rstest]
#[case(f64::MIN_POSITIVE)]
#[case(f64::MAX)]
#[case(-f64::MAX)]
#[case(f64::EPSILON)]
#[case(5e-324)]
#[case(1e21)]
#[case(1e22)]
#[case(1e23)]
#[case(9_007_199_254_740_993.0)]
#[case(0.1 + 0.2)]
fn double_edges_roundtrip(#[case] val: f64) {
    let mut out = [0u8; 24];
    let n = f64toa(&mut out, val);
    let mut pos = 0;
    let Ok(Number::Double(d)) = vnumber(&out[..n], &mut pos) else {
        panic!("{:?} did not lex as a double", &out[..n]);
    };
    assert_eq!(d.to_bits(), val.to_bits());
}

#[test]
fn two_to_the_63() {
    let text = b"9223372036854775808";
    let mut pos = 0;
    assert_eq!(
        vsigned(text, &mut pos),
        Err(ScanError {
            code: ErrorCode::Overflow,
            pos: 0,
        })
    );
    assert_eq!(vunsigned(text, &mut pos), Ok(1 << 63));
    let mut pos = 0;
    assert_eq!(
        vnumber(text, &mut pos),
        Ok(Number::Double(9_223_372_036_854_775_808.0))
    );

    let mut pos = 0;
    assert_eq!(vsigned(b"9223372036854775807", &mut pos), Ok(i64::MAX));
}

#[rstest]
#[case(b"0")]
#[case(b"0.1")]
#[case(b"0e5")]
fn leading_zero_forms(#[case] text: &[u8]) {
    let mut pos = 0;
    assert!(vnumber(text, &mut pos).is_ok());
    assert_eq!(pos, text.len());
}

#[rstest]
#[case(b"null", Ok(Value::Null))]
#[case(b"true", Ok(Value::True))]
#[case(b"false", Ok(Value::False))]
#[case(b"nul", Err(ErrorCode::Eof))]
#[case(b"nulx", Err(ErrorCode::InvalidChar))]
#[case(b"01", Err(ErrorCode::NumberFormat))]
fn literals(#[case] src: &[u8], #[case] expected: Result<Value, ErrorCode>) {
    assert_eq!(value(src, 0).map(|s| s.value).map_err(|e| e.code), expected);
}

/// Property: string values found by the classifier decode to the text the
/// reference encoder was given, and decoding is stable under re-encoding.
#[test]
fn string_values_decode() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        let doc = serde_json::to_string(&text).unwrap();
        let src = doc.as_bytes();
        let Ok(scanned) = value(src, 0) else {
            return false;
        };
        let Value::String(StringSpan { start, end, escape }) = scanned.value else {
            return false;
        };

        let decoded = match escape {
            None => src[start..end].to_vec(),
            Some(_) => {
                let mut dst = vec![0u8; end - start];
                let Ok(out) = unquote(&src[start..], &mut dst, UnquoteFlags::NONE) else {
                    return false;
                };
                if start + out.end != scanned.end {
                    return false;
                }
                dst.truncate(out.len);
                dst
            }
        };
        if decoded != text.as_bytes() {
            return false;
        }

        let again = serde_json::to_string(&String::from_utf8(decoded.clone()).unwrap()).unwrap();
        let mut dst = vec![0u8; again.len()];
        unquote(&again.as_bytes()[1..], &mut dst, UnquoteFlags::NONE)
            .is_ok_and(|out| dst[..out.len] == decoded[..])
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn escaped_quote() {
    let src = br#"a\"b""#;
    let mut dst = [0u8; 8];
    let out = unquote(src, &mut dst, UnquoteFlags::NONE).unwrap();
    assert_eq!(&dst[..out.len], b"a\"b");
}

#[rstest]
#[case(UnquoteFlags::NONE, Err(ErrorCode::InvalidUnicode))]
#[case(UnquoteFlags::UNICODE_REPLACE, Ok("x\u{fffd}y"))]
fn lone_high_surrogate(#[case] flags: UnquoteFlags, #[case] expected: Result<&str, ErrorCode>) {
    let src = br#"x\ud83dy""#;
    let mut dst = [0u8; 16];
    let got = unquote(src, &mut dst, flags)
        .map(|out| std::str::from_utf8(&dst[..out.len]).unwrap().to_owned())
        .map_err(|e| e.code);
    assert_eq!(got.as_deref().map_err(|&e| e), expected);
}
