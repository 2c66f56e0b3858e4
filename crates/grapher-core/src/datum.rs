// File: crates/grapher-core/src/datum.rs
// Summary: Cell values of data rows (numbers, text, dates) with type-aware ordering.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One data row: field name → value, in insertion order.
pub type Row = IndexMap<String, Datum>;

/// A single cell of a data row.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Datum {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl Datum {
    /// Convert a JSON value. Nested arrays/objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Datum::Null, Datum::Number),
            serde_json::Value::String(s) => Datum::Text(s.clone()),
            other => Datum::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Datum::Null) }

    /// Numeric projection used by continuous scales. Dates map to epoch milliseconds.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Number(n) if n.is_finite() => Some(*n),
            Datum::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Datum::Date(d) => Some(d.and_utc().timestamp_millis() as f64),
            Datum::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Identity key: equal data produce equal keys, `1` and `"1"` do not collide.
    pub fn key(&self) -> String {
        match self {
            Datum::Null => "n:".to_string(),
            Datum::Bool(b) => format!("b:{b}"),
            // -0.0 and 0.0 are the same category
            Datum::Number(n) => format!("f:{}", n + 0.0),
            Datum::Text(s) => format!("s:{s}"),
            Datum::Date(d) => format!("d:{}", d.and_utc().timestamp_millis()),
        }
    }

    /// Build a date from epoch milliseconds (used when inverting time scales).
    pub fn from_millis(ms: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms.round() as i64).map(|d| Datum::Date(d.naive_utc()))
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => Ok(()),
            Datum::Bool(b) => write!(f, "{b}"),
            Datum::Number(n) => write!(f, "{n}"),
            Datum::Text(s) => f.write_str(s),
            Datum::Date(d) => {
                if d.hour() == 0 && d.minute() == 0 && d.second() == 0 {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S"))
                }
            }
        }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self { Datum::Text(s.to_string()) }
}

impl From<String> for Datum {
    fn from(s: String) -> Self { Datum::Text(s) }
}

impl From<f64> for Datum {
    fn from(n: f64) -> Self { Datum::Number(n) }
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Datum::Null => serializer.serialize_unit(),
            Datum::Bool(b) => serializer.serialize_bool(*b),
            Datum::Number(n) => serializer.serialize_f64(*n),
            Datum::Text(s) => serializer.serialize_str(s),
            Datum::Date(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Datum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Datum::from_json(&value))
    }
}

/// Total order used for category and x-value sorting.
/// Contract: all-dates sort chronologically, all-numbers numerically,
/// anything else (including mixed types) lexicographically on display text.
pub fn type_aware_cmp(values: &[Datum]) -> fn(&Datum, &Datum) -> Ordering {
    if !values.is_empty() && values.iter().all(|v| matches!(v, Datum::Date(_))) {
        cmp_dates
    } else if !values.is_empty() && values.iter().all(|v| matches!(v, Datum::Number(_))) {
        cmp_numbers
    } else {
        cmp_text
    }
}

fn cmp_dates(a: &Datum, b: &Datum) -> Ordering {
    match (a, b) {
        (Datum::Date(a), Datum::Date(b)) => a.cmp(b),
        _ => cmp_text(a, b),
    }
}

fn cmp_numbers(a: &Datum, b: &Datum) -> Ordering {
    match (a, b) {
        (Datum::Number(a), Datum::Number(b)) => a.total_cmp(b),
        _ => cmp_text(a, b),
    }
}

fn cmp_text(a: &Datum, b: &Datum) -> Ordering {
    a.to_string().cmp(&b.to_string())
}

/// De-duplicate (first occurrence wins) then sort with the type-aware comparator.
pub fn unique_sorted<'a>(values: impl IntoIterator<Item = &'a Datum>) -> Vec<Datum> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<Datum> = Vec::new();
    for v in values {
        if seen.insert(v.key()) {
            out.push(v.clone());
        }
    }
    let cmp = type_aware_cmp(&out);
    out.sort_by(cmp);
    out
}

/// Convert a JSON object into a row, preserving key order.
pub fn row_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Row {
    map.iter().map(|(k, v)| (k.clone(), Datum::from_json(v))).collect()
}
