// File: crates/grapher-core/tests/properties.rs
// Purpose: End-to-end guarantees of the configuration store and derivation engine.

use grapher_core::csv_export::to_csv;
use grapher_core::derive::derive_parsed_data;
use grapher_core::merge::validate_data;
use grapher_core::store::StoreState;
use grapher_core::{ChartKind, ConfigError, ConfigStore, Datum, Environment, Margin, MergeMode};
use serde_json::json;

fn env() -> Environment { Environment { width: 640.0, height: 400.0, font_size: 16.0 } }

fn store(kind: ChartKind, config: serde_json::Value) -> ConfigStore {
    let mut s = ConfigStore::new(MergeMode::Additive, env());
    s.initialize(kind, &config).expect("initialize");
    s
}

fn labels(values: &[Datum]) -> Vec<String> { values.iter().map(ToString::to_string).collect() }

#[test]
fn parsing_twice_yields_equal_output() {
    let s = store(
        ChartKind::Line,
        json!({
            "data": [{ "x": "2024-03-01", "y": "4" }, { "x": "2024-03-02", "y": "5" }],
            "x": { "parse": { "kind": "date" }, "temporal": true },
            "y": { "parse": { "kind": "number" } },
        }),
    );
    let first = derive_parsed_data(s.config()).unwrap();
    let second = derive_parsed_data(s.config()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn categories_are_sorted_and_unique() {
    let s = store(
        ChartKind::Line,
        json!({
            "data": [{ "k": "b" }, { "k": "a" }, { "k": "a" }, { "k": "c" }],
            "category": { "name": "k" },
        }),
    );
    assert_eq!(labels(&s.derived().unwrap().categories), ["a", "b", "c"]);
}

#[test]
fn numeric_categories_sort_numerically() {
    let s = store(
        ChartKind::Line,
        json!({ "data": [{ "k": 30 }, { "k": 5 }, { "k": 5 }, { "k": 10 }], "category": { "name": "k" } }),
    );
    assert_eq!(labels(&s.derived().unwrap().categories), ["5", "10", "30"]);
}

#[test]
fn color_scale_cycles_through_palette() {
    let data: Vec<_> = (0..5).map(|i| json!({ "k": format!("c{i}") })).collect();
    let s = store(
        ChartKind::Line,
        json!({ "data": data, "category": { "name": "k" }, "style": { "colors": ["#a00", "#0a0", "#00a"] } }),
    );
    let d = s.derived().unwrap();
    let colors: Vec<&str> = d.categories.iter().map(|c| d.color_of(c)).collect();
    assert_eq!(colors, ["#a00", "#0a0", "#00a", "#a00", "#0a0"]);
    assert_eq!(d.color_scale.domain(), d.categories.as_slice());

    // within the palette every category gets its own color
    let s = store(ChartKind::Line, json!({ "data": [{ "k": "a" }, { "k": "b" }], "category": { "name": "k" } }));
    let d = s.derived().unwrap();
    assert_ne!(d.color_of(&"a".into()), d.color_of(&"b".into()));
}

#[test]
fn y_label_only_moves_left_margin() {
    let plain = store(ChartKind::Line, json!({}));
    let labelled = store(ChartKind::Line, json!({ "y": { "label": "Revenue" } }));
    let m = labelled.derived().unwrap().margin;
    assert_eq!(m.left, 80.0);
    assert_eq!(m.bottom, plain.derived().unwrap().margin.bottom);
}

#[test]
fn sparkline_margins_are_zero() {
    let s = store(ChartKind::Sparkline, json!({ "x": { "label": "t" }, "y": { "label": "v" } }));
    assert_eq!(s.derived().unwrap().margin, Margin::ZERO);
}

#[test]
fn sparkline_ignores_margin_overrides() {
    for kind in [ChartKind::Sparkline, ChartKind::Sparklines, ChartKind::Donut, ChartKind::Gauge] {
        let s = store(kind, json!({ "margin": { "top": 12, "left": 30 } }));
        assert_eq!(s.derived().unwrap().margin, Margin::ZERO, "{kind:?}");
    }
}

#[test]
fn data_merge_drops_stale_colors() {
    let mut s = store(
        ChartKind::Line,
        json!({
            "data": [{ "x": 1, "y": 1, "k": "a" }, { "x": 1, "y": 2, "k": "b" }, { "x": 1, "y": 3, "k": "c" }],
            "category": { "name": "k" },
        }),
    );
    assert_eq!(s.derived().unwrap().color_scale.len(), 3);
    s.merge(&json!({ "data": [{ "x": 2, "y": 5, "k": "c" }] })).expect("merge");
    let derived = s.derived().unwrap();
    assert_eq!(labels(&derived.categories), ["c"]);
    assert_eq!(derived.color_scale.domain(), derived.categories.as_slice());
}

#[test]
fn allow_list_filters_rows_and_orders_categories() {
    let s = store(
        ChartKind::Line,
        json!({
            "data": [
                { "x": 1, "y": 1, "k": "A" },
                { "x": 1, "y": 2, "k": "B" },
                { "x": 1, "y": 3, "k": "C" },
            ],
            "category": { "name": "k" },
            "categories": ["A", "C"],
        }),
    );
    let d = s.derived().unwrap();
    assert_eq!(labels(&d.categories), ["A", "C"]);
    let kept: Vec<String> = d.parsed_data.iter().map(|r| r["k"].to_string()).collect();
    assert_eq!(kept, ["A", "C"]);
}

#[test]
fn stacks_preserve_signed_sums() {
    let data = json!([
        { "x": 1, "y": 4, "k": "a" }, { "x": 1, "y": -3, "k": "b" }, { "x": 1, "y": 2, "k": "c" },
        { "x": 2, "y": -1, "k": "a" }, { "x": 2, "y": -6, "k": "b" }, { "x": 2, "y": 5, "k": "c" },
    ]);
    let s = store(ChartKind::StackedArea, json!({ "data": data, "category": { "name": "k" } }));
    let stacked = s.derived().unwrap().stacked.clone().expect("stacked data");
    for (i, wide) in stacked.wide.iter().enumerate() {
        let pos: f64 = wide.values.iter().filter(|v| **v > 0.0).sum();
        let neg: f64 = wide.values.iter().filter(|v| **v < 0.0).sum();
        let spans = stacked.series.iter().map(|s| s.points[i].top - s.points[i].baseline);
        let (stack_pos, stack_neg) = spans.fold((0.0, 0.0), |(p, n), d| if d > 0.0 { (p + d, n) } else { (p, n + d) });
        assert_eq!(stack_pos, pos);
        assert_eq!(stack_neg, neg);
    }
}

#[test]
fn csv_matches_legacy_layout() {
    let rows = validate_data(&json!([{ "a": 1, "b": "x" }, { "a": 2, "b": "y" }])).unwrap();
    assert_eq!(to_csv(&rows, true), "a,b\n\"1\",\"x\"\n\"2\",\"y\"");
}

#[test]
fn failed_merge_leaves_store_untouched() {
    let mut s = store(ChartKind::Bar, json!({ "data": [{ "x": 1, "y": 2 }], "legend": { "x": 40 } }));
    let before = s.canonical();
    let err = s.merge(&json!({ "legend": { "x": 99 }, "data": [{ "x": 1 }, "oops"] })).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRow { index: 1, .. }));
    assert_eq!(s.canonical(), before);
    assert_eq!(s.config().legend.x, 40.0);
}

#[test]
fn store_state_machine() {
    let mut s = ConfigStore::new(MergeMode::Additive, env());
    assert_eq!(s.state(), StoreState::Uninitialized);
    assert!(matches!(s.merge(&json!({})), Err(ConfigError::NotInitialized)));
    s.initialize(ChartKind::Dot, &json!({})).unwrap();
    assert_eq!(s.state(), StoreState::Ready);
    assert!(matches!(s.initialize(ChartKind::Dot, &json!({})), Err(ConfigError::AlreadyInitialized)));
    s.merge(&json!({ "style": { "dotSize": 6 } })).unwrap();
    assert_eq!(s.state(), StoreState::Ready);
    assert_eq!(s.config().style.dot_size, 6.0);
}

#[test]
fn kind_argument_wins_over_type_key() {
    let s = store(ChartKind::Gauge, json!({ "type": "line" }));
    assert_eq!(s.config().kind, ChartKind::Gauge);
    assert_eq!(s.config().arc.end_angle, 90.0);
}

#[test]
fn strict_store_rejects_unknown_keys_atomically() {
    let mut s = ConfigStore::new(MergeMode::Strict, env());
    s.initialize(ChartKind::Line, &json!({})).unwrap();
    let before = s.canonical();
    let err = s.merge(&json!({ "legend": { "show": false }, "styl": {} })).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey { ref path } if path == "styl"));
    assert_eq!(s.canonical(), before);
}

#[test]
fn additive_store_keeps_unknown_keys() {
    let mut s = store(ChartKind::Line, json!({}));
    s.merge(&json!({ "custom": { "flag": true } })).unwrap();
    assert_eq!(s.canonical()["custom"]["flag"], json!(true));
}

#[test]
fn merge_reports_change_set() {
    let mut s = store(ChartKind::Line, json!({ "data": [{ "x": 1, "y": 1 }] }));
    let changes = s.merge(&json!({ "y": { "label": "Speed" } })).unwrap();
    assert!(changes.y);
    assert!(!changes.data && !changes.colors);
    assert_eq!(s.derived().unwrap().margin.left, 80.0);
    assert_eq!(s.derived().unwrap().categories, vec![Datum::from("Speed")]);
}

#[test]
fn invalid_typed_value_is_a_config_error() {
    let mut s = store(ChartKind::Line, json!({}));
    let before = s.canonical();
    assert!(matches!(s.merge(&json!({ "style": { "barWidth": "wide" } })), Err(ConfigError::Invalid(_))));
    assert_eq!(s.canonical(), before);
}

#[test]
fn caller_data_mutation_is_not_observable() {
    let mut input = json!({ "data": [{ "x": 1, "y": 2 }] });
    let s = store(ChartKind::Line, input.clone());
    input["data"][0]["y"] = json!(100);
    assert_eq!(s.config().data[0]["y"], Datum::Number(2.0));
}
