// File: crates/grapher-core/src/draw/sparkline.rs
// Summary: Axis-less sparkline(s): range band, line(s), last-point circle and adjacent text.

use super::cartesian::line_paint;
use super::{Frame, PlotGeometry};
use crate::axis::ScaleKind;
use crate::datum::{type_aware_cmp, Datum};
use crate::geometry::{Point, RectF};
use crate::render::{Layer, Paint, Renderer, TextStyle};
use crate::scale::{extent, ContinuousScale, XScale};
use crate::series::{build_series, x_values, Series};
use crate::types::ChartKind;

/// Gap between the last-value text and the label.
const LABEL_GAP: f32 = 16.0 * 0.4;
const CIRCLE_RADIUS: f32 = 1.5;

fn text_size(frame: &Frame<'_>) -> f32 { frame.font_size() * frame.config.sparkline.text_font_scale }

/// Single sparkline: every row joined into one series, in x order.
fn merged_series(frame: &Frame<'_>, parts: Vec<Series>) -> Series {
    let mut points: Vec<_> = parts.into_iter().flat_map(|s| s.points).collect();
    let xs: Vec<Datum> = points.iter().map(|p| p.x.clone()).collect();
    let cmp = type_aware_cmp(&xs);
    points.sort_by(|a, b| cmp(&a.x, &b.x));
    let color = frame.config.sparkline.line_color.clone().unwrap_or_else(|| frame.theme.text.clone());
    Series { key: Datum::Text(frame.config.series_label()), color, points }
}

fn last_value_text(frame: &Frame<'_>, series: &Series) -> Option<String> {
    series.last().map(|p| frame.derived.y_format.format_f64(p.y))
}

pub fn draw(frame: &Frame<'_>, out: &mut dyn Renderer) -> PlotGeometry {
    let config = frame.config;
    let derived = frame.derived;
    let parts = build_series(derived, &config.x.name, &config.y.name);
    let series = if config.kind == ChartKind::Sparkline { vec![merged_series(frame, parts)] } else { parts };

    // room taken by the adjacent text
    let size = text_size(frame);
    let mut side = 0.0;
    if config.sparkline.text_last_point {
        if let Some(text) = series.first().and_then(|s| last_value_text(frame, s)) {
            side += frame.host.measure_text(&text, size).width;
        }
    }
    if let Some(label) = &config.y.label {
        side += frame.host.measure_text(label, size).width + LABEL_GAP;
    }
    let svg_width = (frame.width - side).max(2.0);
    let area = RectF::from_ltrb(0.0, 2.0, svg_width - 2.0, (frame.height - 2.0).max(2.0));

    let xs = x_values(derived, &config.x.name);
    let x_domain = extent(xs.iter().filter_map(Datum::as_f64), ScaleKind::Linear, false).unwrap_or((0.0, 1.0));
    let x = ContinuousScale::linear(x_domain, (area.left, area.right));
    let y_domain = extent(series.iter().flat_map(|s| s.points.iter().map(|p| p.y)), ScaleKind::Linear, false)
        .unwrap_or((0.0, 1.0));
    let y = ContinuousScale::linear(y_domain, (area.bottom, area.top));

    let geometry = PlotGeometry {
        area,
        x: XScale::Continuous(x),
        y,
        x_width: area.width() / xs.len().max(1) as f32,
        x_values: xs,
        series,
        group: None,
        bounds_width: svg_width,
    };

    if let Some((lo, hi)) = config.sparkline.range {
        let fill = config
            .sparkline
            .range_fill_color
            .clone()
            .unwrap_or_else(|| frame.theme.blend(0.2));
        let pxs: Vec<f32> = geometry.x_values.iter().filter_map(Datum::as_f64).map(|v| x.to_px(v)).collect();
        let mut band: Vec<Point> = pxs.iter().map(|px| (*px, y.to_px(hi))).collect();
        band.extend(pxs.iter().rev().map(|px| (*px, y.to_px(lo))));
        out.draw_path(Layer::Background, &band, true, &Paint::fill(fill));
    }

    draw_marks(frame, &geometry, None, out);
    out.set_interactive_region(area);
    geometry
}

/// Lines, last-point circles and side text. Sparklines show the side text of the highlighted series only.
pub fn draw_marks(frame: &Frame<'_>, g: &PlotGeometry, highlight: Option<&Datum>, out: &mut dyn Renderer) {
    out.clear_layer(Layer::Marks);
    out.clear_layer(Layer::SideText);
    let single = frame.kind() == ChartKind::Sparkline;
    let spark = &frame.config.sparkline;
    for s in &g.series {
        let points: Vec<Point> = s
            .points
            .iter()
            .filter_map(|p| g.x.center(&p.x).map(|px| (px, g.y.to_px(p.y))))
            .collect();
        out.draw_path(Layer::Marks, &points, false, &line_paint(frame, &s.key, &s.color, highlight));
        if let Some(&last) = points.last() {
            let color = if single { spark.circle_color.clone() } else { s.color.clone() };
            out.draw_circle(Layer::Marks, last, CIRCLE_RADIUS, &Paint::fill(color));
        }
    }

    let shown: Option<&Series> = if single {
        g.series.first()
    } else {
        highlight.and_then(|h| g.series.iter().find(|s| s.key.key() == h.key()))
    };
    let Some(series) = shown else { return };
    let size = text_size(frame);
    let baseline = frame.height / 2.0 + size * 0.35;
    let mut x = g.bounds_width;
    if spark.text_last_point {
        if let Some(text) = last_value_text(frame, series) {
            let color = if single { spark.text_color.clone() } else { series.color.clone() };
            let style = TextStyle::new(size, color).weight(spark.text_font_weight);
            out.draw_text(Layer::SideText, (x, baseline), &text, &style);
            x += frame.host.measure_text(&text, size).width;
        }
    }
    let label = if single { frame.config.y.label.clone() } else { Some(frame.category_label(&series.key)) };
    if let Some(label) = label {
        let style = TextStyle::new(size, frame.theme.text.clone()).weight(spark.text_font_weight);
        out.draw_text(Layer::SideText, (x + LABEL_GAP, baseline), &label, &style);
    }
}
