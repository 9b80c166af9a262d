//! Layout engine performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use codeedit_engine::layout::{
    LayoutConfiguration, LayoutEngine, LineWrapping, MonospaceMeasurer, Point, Typography,
};
use codeedit_engine::{Position, TextStorage};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn source(lines: usize) -> String {
    (0..lines)
        .map(|n| format!("fn item_{n}(a: u32, b: u32) -> u32 {{ a.wrapping_mul(b) + {n} }} // trailing note"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrapped() -> LayoutConfiguration {
    LayoutConfiguration::new().with_line_wrapping(LineWrapping::FixedWidth(40.0))
}

fn full_layout(c: &mut Criterion) {
    let storage = TextStorage::with_text(&source(5_000));
    let measurer = MonospaceMeasurer::new(1.0, 10.0);
    let typography = Typography::default();

    for (name, config) in [
        ("layout_full_5k_lines_unwrapped", LayoutConfiguration::new()),
        ("layout_full_5k_lines_wrapped", wrapped()),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut engine = LayoutEngine::new(config.clone());
                engine.layout(&storage, &measurer, &typography, black_box(120.0))
            });
        });
    }
}

fn incremental_layout(c: &mut Criterion) {
    let measurer = MonospaceMeasurer::new(1.0, 10.0);
    let typography = Typography::default();
    let text = source(5_000);

    let prepared = || {
        let storage = TextStorage::with_text(&text);
        let mut engine = LayoutEngine::new(wrapped());
        engine.layout(&storage, &measurer, &typography, 120.0);
        (storage, engine)
    };

    c.bench_function("layout_after_char_insert", |b| {
        b.iter_batched(
            prepared,
            |(mut storage, mut engine)| {
                let change = storage.insert("x", Position::new(2_500, 10));
                engine.invalidate(&change);
                engine.layout(&storage, &measurer, &typography, 120.0)
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("layout_after_newline_insert", |b| {
        b.iter_batched(
            prepared,
            |(mut storage, mut engine)| {
                let change = storage.insert("\n", Position::new(2_500, 10));
                engine.invalidate(&change);
                engine.layout(&storage, &measurer, &typography, 120.0)
            },
            BatchSize::LargeInput,
        );
    });
}

fn queries(c: &mut Criterion) {
    let storage = TextStorage::with_text(&source(5_000));
    let measurer = MonospaceMeasurer::new(1.0, 10.0);
    let typography = Typography::default();
    let mut engine = LayoutEngine::new(wrapped());
    engine.layout(&storage, &measurer, &typography, 120.0);

    c.bench_function("query_position_at_point", |b| {
        b.iter(|| engine.position_at_point(black_box(Point::new(17.0, 40_000.0))));
    });

    c.bench_function("query_caret_bounds", |b| {
        b.iter(|| engine.caret_bounds(black_box(Position::new(3_000, 55))));
    });

    c.bench_function("query_position_below", |b| {
        b.iter(|| engine.position_below(black_box(Position::new(3_000, 55))));
    });
}

criterion_group!(benches, full_layout, incremental_layout, queries);
criterion_main!(benches);
