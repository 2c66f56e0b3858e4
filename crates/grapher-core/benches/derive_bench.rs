use std::rc::Rc;

use grapher_core::derive::derive_all;
use grapher_core::{Chart, ChartKind, ConfigStore, ElementInfo, Environment, HeadlessHost, MergeMode};
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use serde_json::{json, Value};

fn long_rows(n: usize, categories: usize) -> Value {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            let x = (i / categories) as f64;
            let y = (i as f64 * 0.01).sin() * 10.0;
            json!({ "x": x, "y": y, "k": format!("c{}", i % categories) })
        })
        .collect();
    Value::Array(rows)
}

fn env() -> Environment { Environment { width: 800.0, height: 500.0, font_size: 16.0 } }

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_all");
    for &n in &[1_000usize, 10_000usize] {
        let mut store = ConfigStore::new(MergeMode::Additive, env());
        store
            .initialize(ChartKind::StackedArea, &json!({ "data": long_rows(n, 5), "category": { "name": "k" } }))
            .expect("initialize");
        group.bench_function(format!("stacked_{n}"), |b| {
            b.iter(|| black_box(derive_all(store.config(), store.environment())));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut store = ConfigStore::new(MergeMode::Additive, env());
    store
        .initialize(ChartKind::Line, &json!({ "data": long_rows(10_000, 4), "category": { "name": "k" } }))
        .expect("initialize");
    let mut flip = false;
    c.bench_function("merge_style_only", |b| {
        b.iter(|| {
            flip = !flip;
            let width = if flip { 2 } else { 3 };
            black_box(store.merge(&json!({ "style": { "strokeWidth": width } }))).ok();
        });
    });
}

fn bench_draw(c: &mut Criterion) {
    let host = Rc::new(
        HeadlessHost::new().with_element("chart", ElementInfo { width: 800.0, height: 500.0, ..ElementInfo::default() }),
    );
    let config = json!({ "data": long_rows(5_000, 5), "category": { "name": "k" } });
    let mut chart = Chart::create(host, "chart", ChartKind::Line, &config, None, None).expect("create");
    c.bench_function("draw_line_5000", |b| {
        b.iter(|| black_box(chart.draw(None)).ok());
    });
}

criterion_group!(benches, bench_derive, bench_merge, bench_draw);
criterion_main!(benches);
