// File: crates/grapher-core/src/series.rs
// Summary: Per-category series extracted from parsed rows, ready for drawing and hit-testing.

use crate::datum::{type_aware_cmp, unique_sorted, Datum};
use crate::derive::Derived;

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPoint {
    pub x: Datum,
    pub y: f64,
    /// Index of the source row in the parsed data.
    pub row: usize,
}

/// Points of one category, sorted by x.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub key: Datum,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn last(&self) -> Option<&SeriesPoint> { self.points.last() }
}

/// One series per category, in category order. Rows with a null or
/// non-numeric y, or a category outside the list, are left out.
pub fn build_series(derived: &Derived, x_field: &str, y_field: &str) -> Vec<Series> {
    let mut series: Vec<Series> = derived
        .categories
        .iter()
        .map(|c| Series { key: c.clone(), color: derived.color_of(c).to_string(), points: Vec::new() })
        .collect();
    let keys: Vec<String> = derived.categories.iter().map(Datum::key).collect();
    for (index, row) in derived.parsed_data.iter().enumerate() {
        let category = derived.category_of(row).key();
        let Some(slot) = keys.iter().position(|k| *k == category) else { continue };
        let Some(y) = row.get(y_field).and_then(Datum::as_f64) else { continue };
        let x = row.get(x_field).cloned().unwrap_or_default();
        if x.is_null() {
            continue;
        }
        series[slot].points.push(SeriesPoint { x, y, row: index });
    }
    for s in &mut series {
        let xs: Vec<Datum> = s.points.iter().map(|p| p.x.clone()).collect();
        let cmp = type_aware_cmp(&xs);
        s.points.sort_by(|a, b| cmp(&a.x, &b.x));
    }
    series
}

/// Distinct non-null x values of the parsed data, sorted type-aware.
pub fn x_values(derived: &Derived, x_field: &str) -> Vec<Datum> {
    unique_sorted(derived.parsed_data.iter().filter_map(|r| r.get(x_field)).filter(|v| !v.is_null()))
}
