// File: crates/grapher-core/tests/derive.rs
// Purpose: Derivation rules (categories, colors, parsing, margins, stacking) and selective re-derivation.

use grapher_core::derive::{
    derive_all, derive_categories, derive_color_scale, derive_margins, derive_parsed_data, long_to_wide, rederive,
    stack_diverging, ChangeSet,
};
use grapher_core::merge::validate_data;
use grapher_core::{ChartConfig, ChartKind, Datum, DerivationError, Environment, Margin, ParseFn, Row};
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<Row> { validate_data(&value).expect("valid rows") }

fn env(width: f32) -> Environment { Environment { width, height: 400.0, font_size: 16.0 } }

fn config(kind: ChartKind, data: serde_json::Value) -> ChartConfig {
    let mut c = ChartConfig::defaults(kind);
    c.data = rows(data);
    c
}

#[test]
fn single_series_uses_y_label_or_name() {
    let mut c = config(ChartKind::Line, json!([{ "x": 1, "y": 2 }]));
    assert_eq!(derive_categories(&c).unwrap(), vec![Datum::from("y")]);
    c.y.label = Some("Revenue".into());
    assert_eq!(derive_categories(&c).unwrap(), vec![Datum::from("Revenue")]);
}

#[test]
fn allow_list_is_used_verbatim_without_duplicates() {
    let mut c = config(ChartKind::Line, json!([{ "x": 1, "y": 2, "k": "a" }]));
    c.category.name = Some("k".into());
    c.categories = Some(vec!["z".into(), "a".into(), "z".into()]);
    assert_eq!(derive_categories(&c).unwrap(), vec![Datum::from("z"), Datum::from("a")]);
}

#[test]
fn mixed_category_types_sort_lexicographically() {
    let mut c = config(
        ChartKind::Line,
        json!([{ "k": 10 }, { "k": "b" }, { "k": 9 }, { "k": "a" }]),
    );
    c.category.name = Some("k".into());
    let cats: Vec<String> = derive_categories(&c).unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(cats, ["10", "9", "a", "b"]);
}

#[test]
fn signed_zero_is_one_category() {
    let mut c = config(ChartKind::Line, json!([{ "k": -0.0 }, { "k": 0 }, { "k": 1 }]));
    c.category.name = Some("k".into());
    assert_eq!(derive_categories(&c).unwrap().len(), 2);
    assert_eq!(Datum::Number(-0.0).key(), Datum::Number(0.0).key());
}

#[test]
fn rows_without_the_category_do_not_contribute() {
    let mut c = config(ChartKind::Line, json!([{ "k": "a" }, { "k": null }, { "other": 1 }]));
    c.category.name = Some("k".into());
    assert_eq!(derive_categories(&c).unwrap(), vec![Datum::from("a")]);
}

#[test]
fn missing_category_field_is_an_error() {
    let mut c = config(ChartKind::Line, json!([{ "x": 1, "y": 2 }]));
    c.category.name = Some("region".into());
    assert_eq!(derive_categories(&c), Err(DerivationError::MissingCategoryField("region".into())));
}

#[test]
fn empty_data_derives_empty_collections() {
    let mut c = config(ChartKind::Line, json!([]));
    c.category.name = Some("region".into());
    let d = derive_all(&c, &env(640.0)).unwrap();
    assert!(d.categories.is_empty());
    assert!(d.parsed_data.is_empty());
    assert!(d.color_scale.is_empty());
}

#[test]
fn stacking_without_category_is_an_error() {
    let c = config(ChartKind::StackedBar, json!([{ "x": 1, "y": 2 }]));
    assert_eq!(derive_all(&c, &env(640.0)), Err(DerivationError::StackWithoutCategory));
}

#[test]
fn empty_palette_falls_back_to_black() {
    let scale = derive_color_scale(&["a".into()], &[]);
    assert_eq!(scale.color_of(&"a".into()), "#000000");
}

#[test]
fn unknown_category_gets_first_color() {
    let scale = derive_color_scale(&["a".into(), "b".into()], &["#111".to_string(), "#222".to_string()]);
    assert_eq!(scale.color_of(&"b".into()), "#222");
    assert_eq!(scale.color_of(&"nope".into()), "#111");
}

#[test]
fn parsed_data_is_a_copy_without_parsers() {
    let c = config(ChartKind::Line, json!([{ "x": "1", "y": "2", "note": "kept" }]));
    let (parsed, field, synthetic) = derive_parsed_data(&c).unwrap();
    assert_eq!(parsed, c.data);
    assert_eq!(field, "category");
    assert!(synthetic);
}

#[test]
fn parsers_rebuild_rows_with_extra_columns() {
    let mut c = config(
        ChartKind::Line,
        json!([{ "x": "2024-01-02", "y": "3.5", "note": "n1", "drop": true }]),
    );
    c.x.parse = Some(ParseFn::Date { format: None });
    c.y.parse = Some(ParseFn::Number);
    c.advanced.additional_columns_in_data = vec!["note".into()];
    let (parsed, _, _) = derive_parsed_data(&c).unwrap();
    let row = &parsed[0];
    let keys: Vec<&str> = row.keys().map(String::as_str).collect();
    assert_eq!(keys, ["x", "y", "category", "note"]);
    assert!(matches!(row["x"], Datum::Date(_)));
    assert_eq!(row["y"], Datum::Number(3.5));
    assert_eq!(row["category"], Datum::from("y"));
    assert_eq!(row["note"], Datum::from("n1"));
}

#[test]
fn caller_data_is_not_aliased() {
    let c = config(ChartKind::Line, json!([{ "x": 1, "y": 2 }]));
    let (mut parsed, _, _) = derive_parsed_data(&c).unwrap();
    parsed[0].insert("y".into(), Datum::Number(99.0));
    assert_eq!(c.data[0]["y"], Datum::Number(2.0));
}

#[test]
fn margins_follow_width_and_labels() {
    let mut c = config(ChartKind::Bar, json!([]));
    assert_eq!(derive_margins(&c, &env(640.0)), Margin::new(10.0, 30.0, 40.0, 60.0));
    assert_eq!(derive_margins(&c, &env(399.0)).right, 20.0);
    c.x.label = Some("Time".into());
    assert_eq!(derive_margins(&c, &env(640.0)).bottom, 52.0);
    c.margin.left = Some(-5.0);
    assert_eq!(derive_margins(&c, &env(640.0)).left, 0.0);
}

#[test]
fn donut_and_gauge_have_no_margins() {
    for kind in [ChartKind::Donut, ChartKind::Gauge, ChartKind::Sparklines] {
        assert_eq!(derive_margins(&ChartConfig::defaults(kind), &env(640.0)), Margin::ZERO);
    }
}

#[test]
fn long_to_wide_keeps_first_seen_order_and_last_value() {
    let data = rows(json!([
        { "x": 2, "y": 1, "k": "a" },
        { "x": 1, "y": 5, "k": "b" },
        { "x": 2, "y": 7, "k": "a" },
    ]));
    let cats = vec![Datum::from("a"), Datum::from("b")];
    let wide = long_to_wide(&data, "x", "y", "k", &cats);
    assert_eq!(wide.len(), 2);
    assert_eq!(wide[0].x, Datum::Number(2.0));
    assert_eq!(wide[0].values, vec![7.0, 0.0]);
    assert_eq!(wide[1].values, vec![0.0, 5.0]);
}

#[test]
fn diverging_stack_splits_signs() {
    let data = rows(json!([
        { "x": 1, "y": 3, "k": "a" },
        { "x": 1, "y": -2, "k": "b" },
        { "x": 1, "y": 0, "k": "c" },
        { "x": 1, "y": 4, "k": "d" },
    ]));
    let cats: Vec<Datum> = ["a", "b", "c", "d"].into_iter().map(Datum::from).collect();
    let series = stack_diverging(&long_to_wide(&data, "x", "y", "k", &cats), &cats);
    let spans: Vec<(f64, f64)> = series.iter().map(|s| (s.points[0].baseline, s.points[0].top)).collect();
    assert_eq!(spans, vec![(0.0, 3.0), (0.0, -2.0), (3.0, 3.0), (3.0, 7.0)]);
}

#[test]
fn rederive_only_touches_dirty_fields() {
    let mut c = config(ChartKind::Line, json!([{ "x": 1, "y": 2, "k": "a" }, { "x": 1, "y": 3, "k": "b" }]));
    c.category.name = Some("k".into());
    let before = derive_all(&c, &env(640.0)).unwrap();

    let mut next = c.clone();
    next.style.colors = vec!["#123456".into()];
    let changes = ChangeSet::between(&c, &next);
    assert!(changes.colors && !changes.data && !changes.category);
    let after = rederive(&before, &next, &env(640.0), &changes).unwrap();
    assert_eq!(after.categories, before.categories);
    assert_eq!(after.parsed_data, before.parsed_data);
    assert_eq!(after.color_of(&"b".into()), "#123456");
    assert_eq!(after, derive_all(&next, &env(640.0)).unwrap());
}

#[test]
fn environment_change_recomputes_margins() {
    let c = config(ChartKind::Line, json!([]));
    let before = derive_all(&c, &env(640.0)).unwrap();
    let changes = ChangeSet { environment: true, ..ChangeSet::default() };
    let after = rederive(&before, &c, &env(300.0), &changes).unwrap();
    assert_eq!(after.margin.right, 20.0);
}

#[test]
fn stacked_bar_x_defaults_to_band() {
    let mut c = config(ChartKind::StackedBar, json!([{ "x": "q1", "y": 1, "k": "a" }]));
    c.category.name = Some("k".into());
    let d = derive_all(&c, &env(640.0)).unwrap();
    assert_eq!(d.x_scale, grapher_core::ScaleKind::Band);
    assert!(d.stacked.is_some());
}
