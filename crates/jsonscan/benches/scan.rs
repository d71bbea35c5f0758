//! Benchmark – skipping, classifying and unescaping
#![allow(missing_docs)]

use std::{fmt::Write as _, time::Duration};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jsonscan::{
    StateMachine, UnquoteFlags, Value, lspace, skip_one, strchr1, unquote,
    scan::{Scalar, Strategy, Wide},
    value,
};

/// A deterministic array of `records` small objects.
fn make_records(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"name":"item \"{i}\"","score":{}.25,"tags":["a","b\n"],"ok":true,"next":null}}"#,
            i * 3
        )
        .unwrap();
    }
    s.push(']');
    s
}

/// A string body of `len` bytes with an escape every 16 bytes, plus the
/// closing quote.
fn make_escaped(len: usize) -> Vec<u8> {
    let mut body: Vec<u8> = (0..len / 2)
        .flat_map(|i| if i % 8 == 7 { *br"\n" } else { *b"ab" })
        .collect();
    body.push(b'"');
    body
}

/// Classifies every token, stepping over separators by hand.
fn walk(src: &[u8]) -> usize {
    let mut pos = 0;
    let mut count = 0;
    while let Ok(scanned) = value(src, pos) {
        if scanned.value == Value::Eof {
            break;
        }
        count += 1;
        pos = lspace(src, scanned.end);
        while let Some(b',' | b':' | b']' | b'}') = src.get(pos) {
            pos = lspace(src, pos + 1);
        }
    }
    count
}

fn bench_skip(c: &mut Criterion) {
    let mut group = c.benchmark_group("skip_one");
    let mut sm = Box::new(StateMachine::new());
    for &records in &[10usize, 1_000] {
        let payload = make_records(records);
        group.bench_with_input(BenchmarkId::from_parameter(records), &payload, |b, p| {
            b.iter(|| {
                let mut pos = 0;
                black_box(skip_one(black_box(p.as_bytes()), &mut pos, &mut sm)).unwrap();
                pos
            });
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let payload = make_records(1_000);
    c.bench_function("value_walk", |b| {
        b.iter(|| walk(black_box(payload.as_bytes())));
    });
}

fn bench_unquote(c: &mut Criterion) {
    let mut group = c.benchmark_group("unquote");
    for &len in &[64usize, 4_096] {
        let src = make_escaped(len);
        let mut dst = vec![0u8; src.len()];
        group.bench_with_input(BenchmarkId::from_parameter(len), &src, |b, s| {
            b.iter(|| unquote(black_box(s), &mut dst, UnquoteFlags::NONE).unwrap());
        });
    }
    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    let spaces = [b" \t\r\n".repeat(256), b"x".to_vec()].concat();
    let text = [vec![b'a'; 4_096], b":".to_vec()].concat();

    group.bench_function("skip_space/scalar", |b| {
        b.iter(|| Scalar::skip_space(black_box(&spaces), 0));
    });
    group.bench_function("skip_space/wide", |b| {
        b.iter(|| Wide::skip_space(black_box(&spaces), 0));
    });
    group.bench_function("find_byte/scalar", |b| {
        b.iter(|| Scalar::find_byte(black_box(&text), 0, b':'));
    });
    group.bench_function("find_byte/wide", |b| {
        b.iter(|| strchr1(black_box(&text), 0, b':'));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_skip, bench_classify, bench_unquote, bench_strategies
}
criterion_main!(benches);
