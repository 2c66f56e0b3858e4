// File: crates/grapher-core/src/config.rs
// Summary: Typed chart configuration with per-kind defaults (serde, camelCase JSON keys).

use serde::{Deserialize, Deserializer, Serialize};

use crate::axis::AxisSpec;
use crate::datum::{Datum, Row};
use crate::error::ConfigError;
use crate::format::TickFormat;
use crate::types::{ChartKind, DEFAULT_PALETTE};

/// Typed view of the canonical configuration tree.
///
/// `data` is owned by the store and never lives in the JSON tree; every other
/// field round-trips through `serde_json::Value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(skip)]
    pub data: Vec<Row>,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub category: CategorySpec,
    /// Allow-list of categories. `null` and `false` both mean "no allow-list".
    #[serde(deserialize_with = "allow_list")]
    pub categories: Option<Vec<Datum>>,
    pub style: Style,
    pub legend: Legend,
    pub grid: GridSpec,
    pub download: Download,
    pub advanced: Advanced,
    pub margin: MarginOverrides,
    pub sparkline: SparklineStyle,
    pub arc: ArcSpec,
}

fn allow_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<Datum>>, D::Error> {
    use serde::de::Error;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
        serde_json::Value::Array(items) => Ok(Some(items.iter().map(Datum::from_json).collect())),
        other => Err(D::Error::custom(format!(
            "`categories` must be a list, null or false, found {}",
            crate::error::json_kind(&other)
        ))),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpec {
    /// Field of each row holding the series key.
    pub name: Option<String>,
    /// Display format of category values (legend, tooltip).
    pub format: Option<TickFormat>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    Widen,
    Color,
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub colors: Vec<String>,
    pub bar_width: f32,
    pub stroke_width: f32,
    pub dot_size: f32,
    pub tooltip_color: Option<String>,
    pub tooltip_background_color: Option<String>,
    pub tooltip_opacity: f32,
    pub tooltip_line_color: Option<String>,
    pub tooltip_dot_size: f32,
    pub beautify_closest_line: Highlight,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            bar_width: 0.8,
            stroke_width: 3.0,
            dot_size: 4.0,
            tooltip_color: None,
            tooltip_background_color: None,
            tooltip_opacity: 0.8,
            tooltip_line_color: None,
            tooltip_dot_size: 5.0,
            beautify_closest_line: Highlight::Widen,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub show: bool,
    pub x: f32,
    /// Defaults to the top margin.
    pub y: Option<f32>,
    pub interstice: f32,
    pub background_color: Option<String>,
    pub opacity: f32,
}

impl Default for Legend {
    fn default() -> Self {
        Self { show: true, x: 15.0, y: None, interstice: 25.0, background_color: None, opacity: 0.9 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Start,
    Middle,
    End,
}

/// User-declared reference line across the plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    #[serde(alias = "x", alias = "y")]
    pub value: Datum,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Option<LabelPosition>,
    #[serde(default)]
    pub class: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub show: bool,
    pub lines: Vec<GridLine>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x: GridAxis,
    pub y: GridAxis,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { x: GridAxis { show: false, lines: Vec::new() }, y: GridAxis { show: true, lines: Vec::new() } }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Download {
    pub filename: Option<String>,
    pub header: bool,
    /// Quote and escape every field instead of the legacy unescaped output.
    pub rfc4180: bool,
}

impl Default for Download {
    fn default() -> Self { Self { filename: None, header: true, rfc4180: false } }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advanced {
    /// Extra row fields carried into parsed data (tooltip, export).
    pub additional_columns_in_data: Vec<String>,
}

/// Per-side margin overrides applied after the computed defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginOverrides {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparklineStyle {
    /// Shaded `[min, max]` band behind the line.
    pub range: Option<(f64, f64)>,
    pub text_last_point: bool,
    pub stroke_width: f32,
    pub line_color: Option<String>,
    pub circle_color: String,
    pub text_color: String,
    pub text_font_scale: f32,
    pub text_font_weight: u16,
    pub range_fill_color: Option<String>,
}

impl Default for SparklineStyle {
    fn default() -> Self {
        Self {
            range: None,
            text_last_point: true,
            stroke_width: 1.0,
            line_color: None,
            circle_color: "#f00".to_string(),
            text_color: "#f00".to_string(),
            text_font_scale: 0.85,
            text_font_weight: 600,
            range_fill_color: None,
        }
    }
}

/// Foreground color applied once the value reaches `from`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub from: f64,
    pub color: String,
}

/// Donut and gauge options. Angles are degrees, clockwise from 12 o'clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSpec {
    pub value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub start_angle: f32,
    pub end_angle: f32,
    pub inner_radius_ratio: f32,
    pub outer_radius_ratio: f32,
    pub corner_radius_ratio: f32,
    pub pad_angle: f32,
    pub display_value: bool,
    pub value_format: Option<TickFormat>,
    pub foreground_color: String,
    pub color_stops: Vec<ColorStop>,
    pub background_color: Option<String>,
    pub font_size: Option<f32>,
    pub max_height_ratio: f32,
}

impl ArcSpec {
    pub fn donut() -> Self {
        Self {
            value: 50.0,
            min_value: 0.0,
            max_value: 100.0,
            start_angle: -180.0,
            end_angle: 180.0,
            inner_radius_ratio: 0.4,
            outer_radius_ratio: 0.5,
            corner_radius_ratio: 0.0,
            pad_angle: 0.03,
            display_value: true,
            value_format: None,
            foreground_color: DEFAULT_PALETTE[0].to_string(),
            color_stops: Vec::new(),
            background_color: None,
            font_size: None,
            max_height_ratio: 1.0,
        }
    }

    pub fn gauge() -> Self {
        Self {
            start_angle: -90.0,
            end_angle: 90.0,
            corner_radius_ratio: 0.1,
            pad_angle: 0.0,
            max_height_ratio: 0.5,
            ..Self::donut()
        }
    }

    /// Foreground color for the current value: the stop with the highest `from` not above it.
    pub fn color_for_value(&self) -> &str {
        self.color_stops
            .iter()
            .filter(|s| s.from <= self.value)
            .max_by(|a, b| a.from.total_cmp(&b.from))
            .map_or(self.foreground_color.as_str(), |s| s.color.as_str())
    }

    /// Value mapped into `[0, 1]` over `[minValue, maxValue]`, clamped.
    pub fn ratio(&self) -> f32 {
        let span = self.max_value - self.min_value;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        ((self.value - self.min_value) / span).clamp(0.0, 1.0) as f32
    }
}

impl ChartConfig {
    /// Kind-specific defaults, before any user configuration is applied.
    pub fn defaults(kind: ChartKind) -> Self {
        let mut config = Self {
            data: Vec::new(),
            kind,
            x: AxisSpec::default_x(),
            y: AxisSpec::default_y(),
            category: CategorySpec::default(),
            categories: None,
            style: Style::default(),
            legend: Legend::default(),
            grid: GridSpec::default(),
            download: Download::default(),
            advanced: Advanced::default(),
            margin: MarginOverrides::default(),
            sparkline: SparklineStyle::default(),
            arc: if kind == ChartKind::Gauge { ArcSpec::gauge() } else { ArcSpec::donut() },
        };
        if kind.is_sparkline() {
            config.style.stroke_width = config.sparkline.stroke_width;
            config.style.tooltip_dot_size = 2.0;
            config.legend.show = false;
            config.grid.y.show = false;
        }
        config
    }

    /// Serialize to the JSON tree (without `data`).
    pub fn to_value(&self) -> Result<serde_json::Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Typed view of a canonical tree; `data` is attached separately.
    pub fn from_value(value: &serde_json::Value, data: Vec<Row>) -> Result<Self, ConfigError> {
        let mut config = ChartConfig::deserialize(value)?;
        config.data = data;
        Ok(config)
    }

    /// Name of the synthetic single category (`y.label`, else `y.name`).
    pub fn series_label(&self) -> String { self.y.series_label() }
}
