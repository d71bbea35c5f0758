#![allow(missing_docs, dead_code)]

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

/// A random JSON document, rendered with `serde_json` as the reference
/// encoder.
#[derive(Debug, Clone)]
pub struct Doc(pub Value);

impl Doc {
    pub fn render(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.0)
        } else {
            serde_json::to_string(&self.0)
        };
        rendered.unwrap()
    }
}

fn finite(g: &mut Gen) -> f64 {
    let mut value = f64::arbitrary(g);
    while !value.is_finite() {
        value = f64::arbitrary(g);
    }
    value
}

fn gen_value(g: &mut Gen, depth: usize) -> Value {
    let choices = if depth == 0 { 6 } else { 8 };
    match usize::arbitrary(g) % choices {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Number(i64::arbitrary(g).into()),
        3 => Value::Number(u64::arbitrary(g).into()),
        4 => Number::from_f64(finite(g)).map_or(Value::Null, Value::Number),
        5 => Value::String(String::arbitrary(g)),
        6 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| gen_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), gen_value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Self(gen_value(g, depth))
    }
}

/// Bytes that may follow a value without extending it.
pub const TAILS: &[&[u8]] = &[b"", b",", b"]", b" }", b"\n, [1]", b":x", b" \"next\""];

pub fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// `n` arrays nested inside each other.
pub fn nested_arrays(n: usize) -> Vec<u8> {
    let mut src = vec![b'['; n];
    src.resize(2 * n, b']');
    src
}

/// `n` objects nested through the key `"a"`, innermost value `0`.
pub fn nested_objects(n: usize) -> Vec<u8> {
    let mut src = b"{\"a\":".repeat(n);
    src.push(b'0');
    src.extend(std::iter::repeat_n(b'}', n));
    src
}
