// File: crates/grapher-core/src/types.rs
// Summary: Shared types and constants (chart kinds, margins, default sizes, palette).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default surface width in pixels, used when neither caller nor host provide one.
pub const WIDTH: f32 = 640.0;
/// Default surface height in pixels.
pub const HEIGHT: f32 = 400.0;
/// Default font size when the host does not report one.
pub const FONT_SIZE: f32 = 16.0;

/// Default series palette. Immutable value data shared by every chart instance.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1abb9b", "#3497da", "#9a59b5", "#f0c30f", "#e57e22",
    "#e64c3c", "#7f8b8c", "#CC6666", "#9999CC", "#66CC99",
];

/// Closed set of chart variants. Kind-specific rules dispatch on this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Line,
    DottedLine,
    Dot,
    Bar,
    StackedBar,
    StackedArea,
    Sparkline,
    Sparklines,
    Donut,
    Gauge,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::Line,
        ChartKind::DottedLine,
        ChartKind::Dot,
        ChartKind::Bar,
        ChartKind::StackedBar,
        ChartKind::StackedArea,
        ChartKind::Sparkline,
        ChartKind::Sparklines,
        ChartKind::Donut,
        ChartKind::Gauge,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::DottedLine => "dotted-line",
            ChartKind::Dot => "dot",
            ChartKind::Bar => "bar",
            ChartKind::StackedBar => "stacked-bar",
            ChartKind::StackedArea => "stacked-area",
            ChartKind::Sparkline => "sparkline",
            ChartKind::Sparklines => "sparklines",
            ChartKind::Donut => "donut",
            ChartKind::Gauge => "gauge",
        }
    }

    pub const fn is_stacked(self) -> bool {
        matches!(self, ChartKind::StackedBar | ChartKind::StackedArea)
    }
    pub const fn is_bar(self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::StackedBar)
    }
    pub const fn is_sparkline(self) -> bool {
        matches!(self, ChartKind::Sparkline | ChartKind::Sparklines)
    }
    pub const fn is_arc(self) -> bool {
        matches!(self, ChartKind::Donut | ChartKind::Gauge)
    }
    /// Kinds drawn as per-category polylines (eligible for closest-line highlight).
    pub const fn has_lines(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::DottedLine | ChartKind::Sparklines)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ChartKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownKind(s.to_string()))
    }
}

/// Plot margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const ZERO: Margin = Margin::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Container metrics the derivations depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, font_size: FONT_SIZE }
    }
}
