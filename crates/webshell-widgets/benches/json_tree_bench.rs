//! Benchmarks for JSON tree rendering and text materialization.
//!
//! Run with: cargo bench -p webshell-widgets

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use webshell_widgets::json_tree::{RenderNode, TreeLines};

// =============================================================================
// Test Data
// =============================================================================

/// Flat array of small records, like a directory listing.
fn listing(len: usize) -> Value {
    Value::Array(
        (0..len)
            .map(|i| {
                json!({
                    "name": format!("file_{i}.txt"),
                    "size": i * 512,
                    "hidden": i % 7 == 0,
                    "owner": null,
                })
            })
            .collect(),
    )
}

/// Deeply nested objects.
fn nested(depth: usize) -> Value {
    let mut value = json!({"leaf": "value with \"quotes\" and 'ticks'"});
    for level in 0..depth {
        value = json!({ format!("level{level}"): value, "items": [1, 2, 3] });
    }
    value
}

fn serialized_len(value: &Value) -> u64 {
    serde_json::to_string(value).map_or(0, |s| s.len() as u64)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_render_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_tree/render_listing");

    for len in [10, 100, 1000] {
        let value = listing(len);
        group.throughput(Throughput::Bytes(serialized_len(&value)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &value, |b, value| {
            b.iter(|| black_box(RenderNode::from_value(value)))
        });
    }

    group.finish();
}

fn bench_render_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_tree/render_nested");

    for depth in [4, 16, 64] {
        let value = nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &value, |b, value| {
            b.iter(|| black_box(RenderNode::from_value(value)))
        });
    }

    group.finish();
}

fn bench_text_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_tree/text_lines");
    let lines = TreeLines::new();

    for len in [10, 100, 1000] {
        let tree = RenderNode::from_value(&listing(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &tree, |b, tree| {
            b.iter(|| black_box(lines.lines(tree)))
        });
    }

    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut tree = RenderNode::from_value(&listing(1000));
    c.bench_function("json_tree/toggle_middle", |b| {
        b.iter(|| black_box(tree.toggle_at(black_box(&[500]))))
    });
}

criterion_group!(
    benches,
    bench_render_listing,
    bench_render_nested,
    bench_text_lines,
    bench_toggle,
);
criterion_main!(benches);
