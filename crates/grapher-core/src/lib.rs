// File: crates/grapher-core/src/lib.rs
// Summary: Core library entry point; exports the configuration pipeline, rendering seam and chart handle.

pub mod axis;
pub mod chart;
pub mod config;
pub mod csv_export;
pub mod datum;
pub mod derive;
pub mod draw;
pub mod error;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod merge;
pub mod render;
pub mod scale;
pub mod series;
pub mod store;
pub mod svg;
pub mod text;
pub mod theme;
pub mod tooltip;
pub mod types;

pub use axis::{AxisSpec, ParseFn, ScaleKind, TimeUnit};
pub use chart::Chart;
pub use config::ChartConfig;
pub use csv_export::{to_csv, to_csv_rfc4180};
pub use datum::{Datum, Row};
pub use derive::{ChangeSet, Derived};
pub use draw::{DrawOutcome, RenderPrecondition};
pub use error::{ChartError, ConfigError, DerivationError, Result};
pub use format::TickFormat;
pub use host::{ElementInfo, HeadlessHost, Host};
pub use merge::MergeMode;
pub use render::{Layer, Paint, Primitive, Renderer, Scene, TextStyle};
pub use store::ConfigStore;
pub use svg::SvgRenderer;
pub use text::{ApproxTextMeasure, TextMeasure, TextSize};
pub use theme::{parse_color, Rgba, Theme};
pub use types::{ChartKind, Environment, Margin};
