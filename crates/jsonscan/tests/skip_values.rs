#![allow(missing_docs)]

mod common;

use common::{Doc, TAILS, nested_arrays, nested_objects, tests};
use insta::assert_snapshot;
use jsonscan::{
    ErrorCode, MAX_RECURSE, ScanError, StateMachine, ValueKind, skip_array, skip_object,
    skip_one, value,
};
use quickcheck::QuickCheck;

fn machine() -> Box<StateMachine> {
    Box::default()
}

fn kind_of(doc: &serde_json::Value) -> ValueKind {
    use serde_json::Value as J;
    match doc {
        J::Null => ValueKind::Null,
        J::Bool(true) => ValueKind::True,
        J::Bool(false) => ValueKind::False,
        J::Number(n) if n.is_f64() || n.as_i64().is_none() => ValueKind::Double,
        J::Number(_) => ValueKind::Integer,
        J::String(_) => ValueKind::String,
        J::Array(_) => ValueKind::Array,
        J::Object(_) => ValueKind::Object,
    }
}

/// Property: skipping a rendered document stops exactly at its end, whatever
/// follows it.
#[test]
fn skip_stops_at_value_end() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, pretty: bool, tail: usize) -> bool {
        let text = doc.render(pretty);
        let mut src = b"  ".to_vec();
        src.extend_from_slice(text.as_bytes());
        src.extend_from_slice(TAILS[tail % TAILS.len()]);

        let mut sm = machine();
        let mut pos = 0;
        skip_one(&src, &mut pos, &mut sm) == Ok(2) && pos == 2 + text.len() && sm.depth() == 0
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, bool, usize) -> bool);
}

/// Property: the classifier agrees with the reference encoder on the kind of
/// every document, and container entry points agree with `skip_one`.
#[test]
fn classifier_and_container_entry_points_agree() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, pretty: bool) -> bool {
        let text = doc.render(pretty);
        let src = text.as_bytes();
        let Ok(scanned) = value(src, 0) else {
            return false;
        };
        if scanned.value.kind() != kind_of(&doc.0) {
            return false;
        }

        let mut sm = machine();
        let mut pos = scanned.end;
        let skipped = match scanned.value.kind() {
            ValueKind::Array => skip_array(src, &mut pos, &mut sm),
            ValueKind::Object => skip_object(src, &mut pos, &mut sm),
            _ => return scanned.end == src.len(),
        };
        skipped == Ok(0) && pos == src.len()
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, bool) -> bool);
}

/// Property: every strict prefix of a compact container document is
/// rejected, never skipped.
#[test]
fn truncated_containers_are_rejected() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, cut: usize) -> bool {
        let text = doc.render(false);
        if !text.starts_with(['[', '{']) {
            return true;
        }
        let src = &text.as_bytes()[..cut % text.len()];
        let mut sm = machine();
        let mut pos = 0;
        skip_one(src, &mut pos, &mut sm).is_err() && pos == 0
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, usize) -> bool);
}

#[test]
fn nesting_up_to_the_limit_is_accepted() {
    let mut sm = machine();
    for src in [nested_arrays(MAX_RECURSE), nested_objects(MAX_RECURSE)] {
        let mut pos = 0;
        assert_eq!(skip_one(&src, &mut pos, &mut sm), Ok(0));
        assert_eq!(pos, src.len());
    }
}

#[test]
fn nesting_past_the_limit_is_rejected() {
    let mut sm = machine();

    let src = nested_arrays(MAX_RECURSE + 1);
    let mut pos = 0;
    assert_eq!(
        skip_one(&src, &mut pos, &mut sm),
        Err(ScanError {
            code: ErrorCode::RecursionLimit,
            pos: MAX_RECURSE,
        })
    );

    let src = nested_objects(MAX_RECURSE + 1);
    let mut pos = 0;
    assert_eq!(
        skip_one(&src, &mut pos, &mut sm),
        Err(ScanError {
            code: ErrorCode::RecursionLimit,
            pos: 5 * MAX_RECURSE,
        })
    );

    // The consumed bracket counts as the first level.
    let src = nested_arrays(MAX_RECURSE + 1);
    let mut pos = 1;
    assert_eq!(
        skip_array(&src, &mut pos, &mut sm),
        Err(ScanError {
            code: ErrorCode::RecursionLimit,
            pos: MAX_RECURSE,
        })
    );
}

#[test]
fn error_rendering() {
    let src = br#"{"a": [1, 2,, 3]}"#;
    let mut sm = machine();
    let mut pos = 0;
    let err = skip_one(src, &mut pos, &mut sm).unwrap_err();
    assert_snapshot!(
        format!("{err}: {}", err.snippet(src)),
        @r#"invalid character at offset 12: {"a": [1, 2,, 3]}"#
    );
}
