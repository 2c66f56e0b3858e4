// File: crates/grapher-core/src/draw/mod.rs
// Summary: Rendering dispatcher: maps one chart kind plus derived state onto Renderer calls.

pub mod arc;
pub mod cartesian;
pub mod sparkline;

use crate::config::ChartConfig;
use crate::datum::Datum;
use crate::derive::Derived;
use crate::geometry::RectF;
use crate::host::Host;
use crate::render::Renderer;
use crate::scale::{BandScale, ContinuousScale, XScale};
use crate::series::Series;
use crate::theme::Theme;
use crate::types::ChartKind;

/// Inputs of one draw pass.
pub struct Frame<'a> {
    pub config: &'a ChartConfig,
    pub derived: &'a Derived,
    pub theme: &'a Theme,
    pub host: &'a dyn Host,
    pub width: f32,
    pub height: f32,
}

impl Frame<'_> {
    pub fn kind(&self) -> ChartKind { self.config.kind }

    pub fn font_size(&self) -> f32 { self.theme.font_size }

    /// Display text of a category (legend, tooltip).
    pub fn category_label(&self, category: &Datum) -> String {
        match &self.config.category.format {
            Some(format) => format.format(category),
            None => category.to_string(),
        }
    }
}

/// Non-fatal condition that prevented the marks from being drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPrecondition {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    /// A warning was drawn instead of the marks.
    Degraded(RenderPrecondition),
}

impl DrawOutcome {
    pub fn is_degraded(&self) -> bool { matches!(self, DrawOutcome::Degraded(_)) }
}

/// Plot geometry kept after a draw, for hit-testing and mark redraws.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotGeometry {
    pub area: RectF,
    pub x: XScale,
    pub y: ContinuousScale,
    /// Distinct x values, sorted.
    pub x_values: Vec<Datum>,
    pub series: Vec<Series>,
    /// Horizontal room of one x value.
    pub x_width: f32,
    /// Category band inside one x value (bar charts).
    pub group: Option<BandScale>,
    /// Width the tooltip box must stay within.
    pub bounds_width: f32,
}

/// Draw `frame` into `out`. Cartesian and sparkline kinds return their plot geometry.
pub fn render(frame: &Frame<'_>, out: &mut dyn Renderer) -> (DrawOutcome, Option<PlotGeometry>) {
    match frame.kind() {
        ChartKind::Line
        | ChartKind::DottedLine
        | ChartKind::Dot
        | ChartKind::Bar
        | ChartKind::StackedBar
        | ChartKind::StackedArea => {
            let (outcome, geometry) = cartesian::draw(frame, out);
            (outcome, Some(geometry))
        }
        ChartKind::Sparkline | ChartKind::Sparklines => (DrawOutcome::Drawn, Some(sparkline::draw(frame, out))),
        ChartKind::Donut | ChartKind::Gauge => {
            arc::draw(frame, out);
            (DrawOutcome::Drawn, None)
        }
    }
}

/// Redraw only the marks, emphasizing `highlight` (closest-line interaction).
pub fn redraw_marks(frame: &Frame<'_>, geometry: &PlotGeometry, highlight: Option<&Datum>, out: &mut dyn Renderer) {
    if frame.kind().is_sparkline() {
        sparkline::draw_marks(frame, geometry, highlight, out);
    } else {
        cartesian::draw_marks(frame, geometry, highlight, out);
    }
}
