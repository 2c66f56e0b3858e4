// File: crates/grapher-core/src/derive.rs
// Summary: Derived chart state (categories, colors, parsed rows, margins, stacks) and selective re-derivation.

use std::collections::HashSet;

use tracing::debug;

use crate::axis::ScaleKind;
use crate::config::ChartConfig;
use crate::datum::{unique_sorted, Datum, Row};
use crate::error::DerivationError;
use crate::format::TickFormat;
use crate::types::{ChartKind, Environment, Margin};

/// Key under which the synthesized category lives in rebuilt rows.
pub const SYNTHETIC_CATEGORY_KEY: &str = "category";
/// Color used when the palette is empty.
pub const FALLBACK_COLOR: &str = "#000000";

/// Category → color mapping. Its domain is exactly the category list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorScale {
    domain: Vec<Datum>,
    keys: Vec<String>,
    colors: Vec<String>,
}

impl ColorScale {
    pub fn domain(&self) -> &[Datum] { &self.domain }

    pub fn colors(&self) -> &[String] { &self.colors }

    pub fn len(&self) -> usize { self.domain.len() }

    pub fn is_empty(&self) -> bool { self.domain.is_empty() }

    /// Color of `category`; categories outside the domain get the first color.
    pub fn color_of(&self, category: &Datum) -> &str {
        let key = category.key();
        self.keys
            .iter()
            .position(|k| *k == key)
            .or(if self.colors.is_empty() { None } else { Some(0) })
            .and_then(|i| self.colors.get(i))
            .map_or(FALLBACK_COLOR, String::as_str)
    }
}

/// Stack of one category: `[baseline, top]` per x value, in wide-row order.
#[derive(Clone, Debug, PartialEq)]
pub struct StackSeries {
    pub key: Datum,
    pub points: Vec<StackPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackPoint {
    pub x: Datum,
    pub baseline: f64,
    pub top: f64,
}

/// One x value of the pivoted data: a value per category, in category order.
#[derive(Clone, Debug, PartialEq)]
pub struct WideRow {
    pub x: Datum,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackedData {
    pub wide: Vec<WideRow>,
    pub series: Vec<StackSeries>,
}

/// Everything computed from the canonical configuration. Never merged by callers.
#[derive(Clone, Debug, PartialEq)]
pub struct Derived {
    pub categories: Vec<Datum>,
    pub color_scale: ColorScale,
    pub parsed_data: Vec<Row>,
    /// Field of parsed rows holding the category.
    pub category_field: String,
    /// True when there is no `category.name` and every row belongs to one synthetic series.
    pub synthetic_category: bool,
    pub margin: Margin,
    pub stacked: Option<StackedData>,
    pub x_scale: ScaleKind,
    pub y_scale: ScaleKind,
    pub x_format: TickFormat,
    pub y_format: TickFormat,
}

impl Derived {
    /// Category a parsed row belongs to.
    pub fn category_of(&self, row: &Row) -> Datum {
        if self.synthetic_category {
            return row
                .get(SYNTHETIC_CATEGORY_KEY)
                .cloned()
                .or_else(|| self.categories.first().cloned())
                .unwrap_or_default();
        }
        row.get(&self.category_field).cloned().unwrap_or_default()
    }

    pub fn color_of(&self, category: &Datum) -> &str { self.color_scale.color_of(category) }
}

/// Which inputs of the derivations differ between two typed configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub data: bool,
    pub x: bool,
    pub y: bool,
    pub category: bool,
    pub categories: bool,
    pub kind: bool,
    pub colors: bool,
    pub margin: bool,
    pub advanced: bool,
    pub environment: bool,
}

impl ChangeSet {
    pub const fn all() -> Self {
        Self {
            data: true,
            x: true,
            y: true,
            category: true,
            categories: true,
            kind: true,
            colors: true,
            margin: true,
            advanced: true,
            environment: true,
        }
    }

    pub fn between(old: &ChartConfig, new: &ChartConfig) -> Self {
        Self {
            data: old.data != new.data,
            x: old.x != new.x,
            y: old.y != new.y,
            category: old.category != new.category,
            categories: old.categories != new.categories,
            kind: old.kind != new.kind,
            colors: old.style.colors != new.style.colors,
            margin: old.margin != new.margin,
            advanced: old.advanced != new.advanced,
            environment: false,
        }
    }

    pub fn is_empty(&self) -> bool { *self == Self::default() }

    fn categories_dirty(&self) -> bool { self.data || self.category || self.categories || self.y }

    fn parsed_dirty(&self) -> bool {
        self.data || self.x || self.y || self.category || self.categories || self.advanced
    }

    fn margins_dirty(&self) -> bool { self.x || self.y || self.kind || self.margin || self.environment }

    fn axes_dirty(&self) -> bool { self.x || self.y || self.kind }
}

/// Distinct categories, order-stable.
///
/// No `category.name` and no allow-list: the single series label. An allow-list
/// is used verbatim. Otherwise the distinct values of the category field, sorted
/// type-aware. Rows without the field (or with a null value) contribute nothing.
pub fn derive_categories(config: &ChartConfig) -> Result<Vec<Datum>, DerivationError> {
    if let Some(allow) = &config.categories {
        let mut seen = HashSet::new();
        return Ok(allow.iter().filter(|c| seen.insert(c.key())).cloned().collect());
    }
    let Some(name) = &config.category.name else {
        return Ok(vec![Datum::Text(config.series_label())]);
    };
    check_category_field(config, name)?;
    Ok(unique_sorted(config.data.iter().filter_map(|row| row.get(name)).filter(|v| !v.is_null())))
}

fn check_category_field(config: &ChartConfig, name: &str) -> Result<(), DerivationError> {
    if !config.data.is_empty() && !config.data.iter().any(|row| row.contains_key(name)) {
        return Err(DerivationError::MissingCategoryField(name.to_string()));
    }
    Ok(())
}

/// `colors[i % len]` for the i-th category. Rebuilt whole every time.
pub fn derive_color_scale(categories: &[Datum], palette: &[String]) -> ColorScale {
    let colors = categories
        .iter()
        .enumerate()
        .map(|(i, _)| if palette.is_empty() { FALLBACK_COLOR.to_string() } else { palette[i % palette.len()].clone() })
        .collect();
    ColorScale { domain: categories.to_vec(), keys: categories.iter().map(Datum::key).collect(), colors }
}

/// Rows as plotted. Returns the rows, the category field and whether it is synthetic.
///
/// Without parsers and allow-list the rows are copied as-is. Otherwise each row is
/// rebuilt as `{x, y, category, ...additional columns}` and, when a category field
/// is named, rows outside the allow-list are dropped.
pub fn derive_parsed_data(config: &ChartConfig) -> Result<(Vec<Row>, String, bool), DerivationError> {
    let named = config.category.name.clone();
    let synthetic = named.is_none();
    let field = named.clone().unwrap_or_else(|| SYNTHETIC_CATEGORY_KEY.to_string());
    if let Some(name) = &named {
        check_category_field(config, name)?;
    }

    if config.x.parse.is_none() && config.y.parse.is_none() && config.categories.is_none() {
        return Ok((config.data.clone(), field, synthetic));
    }

    let allow: Option<HashSet<String>> = match (&config.categories, &named) {
        (Some(list), Some(_)) => Some(list.iter().map(Datum::key).collect()),
        _ => None,
    };
    let label = Datum::Text(config.series_label());
    let extra = &config.advanced.additional_columns_in_data;

    let mut rows = Vec::with_capacity(config.data.len());
    for source in &config.data {
        let category = match &named {
            Some(name) => source.get(name).cloned().unwrap_or_default(),
            None => label.clone(),
        };
        if let Some(allow) = &allow {
            if !allow.contains(&category.key()) {
                continue;
            }
        }
        let mut row = Row::with_capacity(3 + extra.len());
        row.insert(config.x.name.clone(), config.x.parse_value(source.get(&config.x.name).unwrap_or(&Datum::Null)));
        row.insert(config.y.name.clone(), config.y.parse_value(source.get(&config.y.name).unwrap_or(&Datum::Null)));
        row.insert(field.clone(), category);
        for column in extra {
            row.entry(column.clone()).or_insert_with(|| source.get(column).cloned().unwrap_or_default());
        }
        rows.push(row);
    }
    Ok((rows, field, synthetic))
}

/// Plot margins for the chart kind and container, then per-side overrides.
/// Sparkline, donut and gauge kinds always get zero margins.
pub fn derive_margins(config: &ChartConfig, env: &Environment) -> Margin {
    if matches!(config.kind, ChartKind::Sparkline | ChartKind::Sparklines | ChartKind::Donut | ChartKind::Gauge) {
        return Margin::ZERO;
    }
    let o = &config.margin;
    Margin {
        top: o.top.unwrap_or(10.0).max(0.0),
        right: o.right.unwrap_or(if env.width < 400.0 { 20.0 } else { 30.0 }).max(0.0),
        bottom: o.bottom.unwrap_or(if config.x.label.is_some() { 2.0 * env.font_size + 20.0 } else { 40.0 }).max(0.0),
        left: o.left.unwrap_or(if config.y.label.is_some() { 80.0 } else { 60.0 }).max(0.0),
    }
}

/// Pivot long rows to one row per x value (first-seen order), one column per category.
/// Duplicate (x, category) pairs keep the last value; missing or non-numeric values are 0.
pub fn long_to_wide(rows: &[Row], x_field: &str, y_field: &str, category_field: &str, categories: &[Datum]) -> Vec<WideRow> {
    let columns: Vec<String> = categories.iter().map(Datum::key).collect();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut wide: Vec<WideRow> = Vec::new();
    for row in rows {
        let x = row.get(x_field).cloned().unwrap_or_default();
        let slot = *index.entry(x.key()).or_insert_with(|| {
            wide.push(WideRow { x, values: vec![0.0; columns.len()] });
            wide.len() - 1
        });
        let category = row.get(category_field).map(Datum::key).unwrap_or_default();
        if let Some(col) = columns.iter().position(|c| *c == category) {
            wide[slot].values[col] = row.get(y_field).and_then(Datum::as_f64).unwrap_or(0.0);
        }
    }
    wide
}

/// Diverging stack: positives grow upward from 0, negatives downward from 0.
/// A zero value sits at the current positive top with no height.
pub fn stack_diverging(wide: &[WideRow], categories: &[Datum]) -> Vec<StackSeries> {
    let mut series: Vec<StackSeries> = categories
        .iter()
        .map(|key| StackSeries { key: key.clone(), points: Vec::with_capacity(wide.len()) })
        .collect();
    for row in wide {
        let (mut yp, mut yn) = (0.0_f64, 0.0_f64);
        for (i, s) in series.iter_mut().enumerate() {
            let v = row.values.get(i).copied().unwrap_or(0.0);
            let (baseline, top) = if v > 0.0 {
                let b = yp;
                yp += v;
                (b, yp)
            } else if v < 0.0 {
                let b = yn;
                yn += v;
                (b, yn)
            } else {
                (yp, yp)
            };
            s.points.push(StackPoint { x: row.x.clone(), baseline, top });
        }
    }
    series
}

pub fn derive_stacked_data(config: &ChartConfig, parsed: &[Row], categories: &[Datum]) -> Result<StackedData, DerivationError> {
    if config.category.name.is_none() {
        return Err(DerivationError::StackWithoutCategory);
    }
    let field = config.category.name.as_deref().unwrap_or(SYNTHETIC_CATEGORY_KEY);
    let wide = long_to_wide(parsed, &config.x.name, &config.y.name, field, categories);
    let series = stack_diverging(&wide, categories);
    Ok(StackedData { wide, series })
}

/// Full derivation from scratch.
pub fn derive_all(config: &ChartConfig, env: &Environment) -> Result<Derived, DerivationError> {
    debug!(kind = %config.kind, rows = config.data.len(), "deriving chart state");
    let categories = derive_categories(config)?;
    let color_scale = derive_color_scale(&categories, &config.style.colors);
    let (parsed_data, category_field, synthetic_category) = derive_parsed_data(config)?;
    let stacked = if config.kind.is_stacked() {
        Some(derive_stacked_data(config, &parsed_data, &categories)?)
    } else {
        None
    };
    Ok(Derived {
        margin: derive_margins(config, env),
        x_scale: config.x.resolved_scale(config.kind, true),
        y_scale: config.y.resolved_scale(config.kind, false),
        x_format: config.x.resolved_tick_format(),
        y_format: config.y.resolved_tick_format(),
        categories,
        color_scale,
        parsed_data,
        category_field,
        synthetic_category,
        stacked,
    })
}

/// Re-run only the derivations whose inputs are in `changes`, starting from `previous`.
pub fn rederive(previous: &Derived, config: &ChartConfig, env: &Environment, changes: &ChangeSet) -> Result<Derived, DerivationError> {
    let mut next = previous.clone();
    let categories_dirty = changes.categories_dirty();
    if categories_dirty {
        debug!("re-deriving categories");
        next.categories = derive_categories(config)?;
    }
    if categories_dirty || changes.colors {
        debug!(categories = next.categories.len(), "re-deriving color scale");
        next.color_scale = derive_color_scale(&next.categories, &config.style.colors);
    }
    let parsed_dirty = changes.parsed_dirty();
    if parsed_dirty {
        debug!("re-deriving parsed data");
        let (rows, field, synthetic) = derive_parsed_data(config)?;
        next.parsed_data = rows;
        next.category_field = field;
        next.synthetic_category = synthetic;
    }
    if changes.margins_dirty() {
        debug!("re-deriving margins");
        next.margin = derive_margins(config, env);
    }
    if changes.axes_dirty() {
        next.x_scale = config.x.resolved_scale(config.kind, true);
        next.y_scale = config.y.resolved_scale(config.kind, false);
        next.x_format = config.x.resolved_tick_format();
        next.y_format = config.y.resolved_tick_format();
    }
    if parsed_dirty || categories_dirty || changes.kind {
        next.stacked = if config.kind.is_stacked() {
            debug!("re-deriving stacked data");
            Some(derive_stacked_data(config, &next.parsed_data, &next.categories)?)
        } else {
            None
        };
    }
    Ok(next)
}
