// File: crates/grapher-core/tests/merge.rs
// Purpose: Deep-merge rules (nested mappings, overwrites, opaque slots, strict mode) and data validation.

use grapher_core::merge::{deep_merge, split_partial, validate_data, MergeMode};
use grapher_core::ConfigError;
use serde_json::json;

#[test]
fn nested_mappings_merge_and_scalars_overwrite() {
    let mut tree = json!({ "style": { "barWidth": 0.8, "strokeWidth": 3 }, "legend": { "show": true } });
    deep_merge(&mut tree, &json!({ "style": { "barWidth": 0.5 } }), MergeMode::Additive, "").unwrap();
    assert_eq!(tree, json!({ "style": { "barWidth": 0.5, "strokeWidth": 3 }, "legend": { "show": true } }));
}

#[test]
fn arrays_are_replaced_not_merged() {
    let mut tree = json!({ "style": { "colors": ["#111", "#222", "#333"] } });
    deep_merge(&mut tree, &json!({ "style": { "colors": ["#999"] } }), MergeMode::Additive, "").unwrap();
    assert_eq!(tree["style"]["colors"], json!(["#999"]));
}

#[test]
fn opaque_keys_are_replaced_whole() {
    let mut tree = json!({ "x": { "parse": { "kind": "date", "format": "%Y" } } });
    deep_merge(&mut tree, &json!({ "x": { "parse": { "kind": "number" } } }), MergeMode::Additive, "").unwrap();
    assert_eq!(tree["x"]["parse"], json!({ "kind": "number" }));
}

#[test]
fn null_overwrites_a_mapping() {
    let mut tree = json!({ "margin": { "top": 5 } });
    deep_merge(&mut tree, &json!({ "margin": null }), MergeMode::Additive, "").unwrap();
    assert!(tree["margin"].is_null());
}

#[test]
fn additive_mode_inserts_unknown_keys() {
    let mut tree = json!({ "style": {} });
    deep_merge(&mut tree, &json!({ "style": { "shadow": true }, "extra": 1 }), MergeMode::Additive, "").unwrap();
    assert_eq!(tree["style"]["shadow"], json!(true));
    assert_eq!(tree["extra"], json!(1));
}

#[test]
fn strict_mode_reports_dotted_path() {
    let mut tree = json!({ "style": { "barWidth": 0.8 } });
    let err = deep_merge(&mut tree, &json!({ "style": { "barWidht": 0.5 } }), MergeMode::Strict, "").unwrap_err();
    match err {
        ConfigError::UnknownKey { path } => assert_eq!(path, "style.barWidht"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn split_partial_separates_data() {
    let (rest, data) = split_partial(&json!({ "data": [{ "x": 1 }], "legend": { "show": false } })).unwrap();
    assert_eq!(rest, json!({ "legend": { "show": false } }));
    let rows = data.expect("data present");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("x").and_then(|d| d.as_f64()), Some(1.0));
}

#[test]
fn split_partial_rejects_non_mapping() {
    assert!(matches!(split_partial(&json!([1, 2])), Err(ConfigError::NotAMapping { .. })));
}

#[test]
fn data_must_be_a_sequence_of_mappings() {
    assert!(matches!(validate_data(&json!({ "x": 1 })), Err(ConfigError::InvalidData { .. })));
    match validate_data(&json!([{ "x": 1 }, 7])) {
        Err(ConfigError::InvalidRow { index, found }) => {
            assert_eq!(index, 1);
            assert_eq!(found, "a number");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn row_key_order_is_preserved() {
    let rows = validate_data(&json!([{ "zeta": 1, "alpha": 2, "mid": 3 }])).unwrap();
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}
