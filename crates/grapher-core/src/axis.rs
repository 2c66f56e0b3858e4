// File: crates/grapher-core/src/axis.rs
// Summary: Axis model (field name, scale kind, parsing, tick format, label, domain).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::datum::Datum;
use crate::format::TickFormat;
use crate::types::ChartKind;

/// Date pattern used when a date parser has no explicit format.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[serde(alias = "scaleLinear")]
    Linear,
    #[serde(alias = "scaleTime", alias = "scaleUtc")]
    Time,
    #[serde(alias = "scaleLog")]
    Log,
    #[serde(alias = "scaleBand")]
    Band,
    #[serde(alias = "scaleOrdinal", alias = "scalePoint")]
    Ordinal,
}

impl ScaleKind {
    pub const fn is_discrete(self) -> bool {
        matches!(self, ScaleKind::Band | ScaleKind::Ordinal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Millis,
}

/// Declarative replacement for a parsing callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParseFn {
    /// Numbers and numeric strings become numbers; anything else becomes null.
    Number,
    /// Everything is rendered to its display text.
    Text,
    /// Strings parsed with a chrono pattern (`format`, else the axis `formatPattern`).
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    /// Epoch numbers converted to dates.
    Timestamp { unit: TimeUnit },
}

impl ParseFn {
    pub const fn is_temporal(&self) -> bool {
        matches!(self, ParseFn::Date { .. } | ParseFn::Timestamp { .. })
    }

    /// Parse one value. `fallback_pattern` comes from the axis' `formatPattern`.
    pub fn apply(&self, value: &Datum, fallback_pattern: Option<&str>) -> Datum {
        match self {
            ParseFn::Number => match value {
                Datum::Number(_) => value.clone(),
                other => other.as_f64().map_or(Datum::Null, Datum::Number),
            },
            ParseFn::Text => match value {
                Datum::Null => Datum::Null,
                other => Datum::Text(other.to_string()),
            },
            ParseFn::Date { format } => {
                let pattern = format.as_deref().or(fallback_pattern).unwrap_or(DEFAULT_DATE_PATTERN);
                match value {
                    Datum::Date(_) => value.clone(),
                    Datum::Text(s) => parse_date(s.trim(), pattern).map_or(Datum::Null, Datum::Date),
                    _ => Datum::Null,
                }
            }
            ParseFn::Timestamp { unit } => {
                if let Datum::Date(_) = value {
                    return value.clone();
                }
                let Some(n) = value.as_f64() else { return Datum::Null };
                let ms = match unit {
                    TimeUnit::Seconds => n * 1000.0,
                    TimeUnit::Millis => n,
                };
                DateTime::from_timestamp_millis(ms.round() as i64)
                    .map_or(Datum::Null, |d| Datum::Date(d.naive_utc()))
            }
        }
    }
}

fn parse_date(s: &str, pattern: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, pattern)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, pattern).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Options of one cartesian axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    /// Field of each data row plotted on this axis.
    pub name: String,
    /// Explicit scale. When unset the scale is resolved (see [`AxisSpec::resolved_scale`]).
    pub scale: Option<ScaleKind>,
    pub parse: Option<ParseFn>,
    /// Caller-declared temporal axis; selects a time scale when `scale` is unset.
    pub temporal: bool,
    /// Date pattern of the raw values; also drives the default tick format.
    pub format_pattern: Option<String>,
    pub tick_format: Option<TickFormat>,
    pub label: Option<String>,
    /// Hard bounds `[min, max]`, in raw (unparsed) form.
    pub domain: Option<Vec<Datum>>,
    pub nice: bool,
    /// Inner padding of band scales, in `[0, 1)`.
    pub padding: Option<f32>,
}

impl AxisSpec {
    pub fn new(name: impl Into<String>, nice: bool) -> Self {
        Self {
            name: name.into(),
            scale: None,
            parse: None,
            temporal: false,
            format_pattern: None,
            tick_format: None,
            label: None,
            domain: None,
            nice,
            padding: None,
        }
    }

    pub fn default_x() -> Self { Self::new("x", false) }

    pub fn default_y() -> Self { Self::new("y", true) }

    /// Explicit scale, else time for temporal axes, else band for the x of stacked bars.
    pub fn resolved_scale(&self, kind: ChartKind, is_x: bool) -> ScaleKind {
        if let Some(scale) = self.scale {
            return scale;
        }
        if self.temporal {
            ScaleKind::Time
        } else if is_x && kind == ChartKind::StackedBar {
            ScaleKind::Band
        } else {
            ScaleKind::Linear
        }
    }

    /// Explicit tick format, else a time format built from `formatPattern`, else `.3s`.
    pub fn resolved_tick_format(&self) -> TickFormat {
        if let Some(fmt) = &self.tick_format {
            return fmt.clone();
        }
        match &self.format_pattern {
            Some(pattern) => TickFormat::Time { pattern: pattern.clone() },
            None => TickFormat::default(),
        }
    }

    /// Parse a raw value with this axis' parser (passthrough when none).
    pub fn parse_value(&self, value: &Datum) -> Datum {
        match &self.parse {
            Some(parse) => parse.apply(value, self.format_pattern.as_deref()),
            None => value.clone(),
        }
    }

    /// Label shown for the single series of a chart without categories.
    pub fn series_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.name.clone())
    }
}
