#![no_main]

use arbitrary::Arbitrary;
use jsonscan::{
    StateMachine, UnquoteFlags, lspace, scan::{Scalar, Strategy, Wide}, skip_one, unquote,
    unquote_in_place, value,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    start: u16,
    flags: u8,
    needles: (u8, u8),
    data: &'a [u8],
}

fn strategies_agree(src: &[u8], from: usize, (a, b): (u8, u8)) {
    assert_eq!(Scalar::find_byte(src, from, a), Wide::find_byte(src, from, a));
    assert_eq!(
        Scalar::find_either(src, from, a, b),
        Wide::find_either(src, from, a, b)
    );
    assert_eq!(
        Scalar::skip_byte_run(src, from, a),
        Wide::skip_byte_run(src, from, a)
    );
    assert_eq!(Scalar::skip_space(src, from), Wide::skip_space(src, from));
    assert_eq!(Scalar::find_quote(src, from), Wide::find_quote(src, from));
}

fn skip_stays_in_bounds(src: &[u8], from: usize, sm: &mut StateMachine) {
    let mut pos = from;
    match skip_one(src, &mut pos, sm) {
        Ok(start) => {
            assert!(from <= start && start < pos && pos <= src.len());
            assert_eq!(sm.depth(), 0);
        }
        Err(e) => {
            assert_eq!(pos, from);
            assert!(e.pos <= src.len());
        }
    }
}

fn classify_stays_in_bounds(src: &[u8], from: usize) {
    match value(src, from) {
        Ok(scanned) => assert!(scanned.start <= scanned.end && scanned.end <= src.len()),
        Err(e) => assert!(e.pos <= src.len()),
    }
}

fn unquote_modes_agree(src: &[u8], flags: UnquoteFlags) {
    let mut dst = vec![0u8; src.len()];
    let split = unquote(src, &mut dst, flags);

    let mut buf = src.to_vec();
    let in_place = unquote_in_place(&mut buf, flags);

    assert_eq!(split, in_place);
    if let Ok(out) = split {
        assert!(out.len <= out.end);
        assert_eq!(dst[..out.len], buf[..out.len]);
    }
}

/// Documents the reference parser accepts are skipped whole.
fn accepts_reference_documents(src: &[u8], sm: &mut StateMachine) {
    if serde_json::from_slice::<serde_json::Value>(src).is_err() {
        return;
    }
    let mut pos = 0;
    assert!(skip_one(src, &mut pos, sm).is_ok());
    assert_eq!(lspace(src, pos), src.len());
}

fuzz_target!(|input: Input<'_>| {
    let src = input.data;
    let from = usize::from(input.start) % (src.len() + 1);
    let mut sm = Box::<StateMachine>::default();

    strategies_agree(src, from, input.needles);
    skip_stays_in_bounds(src, from, &mut sm);
    classify_stays_in_bounds(src, from);
    unquote_modes_agree(&src[from..], UnquoteFlags::from_bits_truncate(input.flags.into()));
    accepts_reference_documents(src, &mut sm);
});
