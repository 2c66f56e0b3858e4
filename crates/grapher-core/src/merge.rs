// File: crates/grapher-core/src/merge.rs
// Summary: Deep merge of partial JSON configuration into the canonical tree, plus data validation.

use serde_json::{Map, Value};

use crate::datum::{row_from_json, Row};
use crate::error::{json_kind, ConfigError};

/// Keys holding declarative "function" slots. Always replaced whole, never merged.
pub const OPAQUE_KEYS: [&str; 4] = ["parse", "tickFormat", "format", "valueFormat"];

/// How keys absent from the canonical tree are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Unknown keys are kept in the tree and ignored by the typed view.
    #[default]
    Additive,
    /// Unknown keys are rejected with [`ConfigError::UnknownKey`].
    Strict,
}

/// Merge `patch` into `target`. Mappings merge recursively; arrays, scalars
/// and null overwrite. `path` is the dotted location used in error messages.
pub fn deep_merge(target: &mut Value, patch: &Value, mode: MergeMode, path: &str) -> Result<(), ConfigError> {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return Ok(());
    };
    let Some(target_map) = target.as_object_mut() else {
        *target = patch.clone();
        return Ok(());
    };
    for (key, patch_val) in patch_map {
        let child_path = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
        match target_map.get_mut(key) {
            Some(existing) if OPAQUE_KEYS.contains(&key.as_str()) => {
                *existing = patch_val.clone();
            }
            Some(existing) => deep_merge(existing, patch_val, mode, &child_path)?,
            None if mode == MergeMode::Strict => {
                return Err(ConfigError::UnknownKey { path: child_path });
            }
            None => {
                target_map.insert(key.clone(), patch_val.clone());
            }
        }
    }
    Ok(())
}

/// Check that a partial is a mapping and split its `data` off the rest.
/// `data` is validated eagerly; the returned rows are owned copies.
pub fn split_partial(partial: &Value) -> Result<(Value, Option<Vec<Row>>), ConfigError> {
    let Value::Object(map) = partial else {
        return Err(ConfigError::NotAMapping { found: json_kind(partial) });
    };
    let mut rest = Map::with_capacity(map.len());
    let mut data = None;
    for (key, value) in map {
        if key == "data" {
            data = Some(validate_data(value)?);
        } else {
            rest.insert(key.clone(), value.clone());
        }
    }
    Ok((Value::Object(rest), data))
}

/// `data` must be an array of mappings.
pub fn validate_data(value: &Value) -> Result<Vec<Row>, ConfigError> {
    let Value::Array(items) = value else {
        return Err(ConfigError::InvalidData { found: json_kind(value) });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row_from_json(row)),
            other => Err(ConfigError::InvalidRow { index, found: json_kind(other) }),
        })
        .collect()
}

