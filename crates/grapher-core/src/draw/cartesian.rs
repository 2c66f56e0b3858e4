// File: crates/grapher-core/src/draw/cartesian.rs
// Summary: Cartesian charts (line, dotted-line, dot, bar, stacked bar/area): scales, axes, grids, marks, legend.

use tracing::warn;

use super::{DrawOutcome, Frame, PlotGeometry, RenderPrecondition};
use crate::axis::{AxisSpec, ScaleKind};
use crate::config::{GridLine, Highlight, LabelPosition};
use crate::datum::Datum;
use crate::geometry::{Point, RectF};
use crate::render::{Anchor, AxisDraw, AxisOrient, Layer, Paint, Renderer, TextStyle};
use crate::scale::{extent, BandScale, ContinuousScale, XScale};
use crate::series::{build_series, x_values};
use crate::text::split_string;
use crate::types::ChartKind;

pub const BAR_WARNING: &str =
    "WARNING: Graph cannot be plotted because there are too many bars to be displayed compare to the available width.";

const Y_TICKS: usize = 10;
const TICK_SIZE: f32 = 6.0;

pub fn draw(frame: &Frame<'_>, out: &mut dyn Renderer) -> (DrawOutcome, PlotGeometry) {
    let m = frame.derived.margin;
    let area = RectF::from_ltrb(
        m.left,
        m.top,
        (frame.width - m.right).max(m.left),
        (frame.height - m.bottom).max(m.top),
    );
    let geometry = layout(frame, area);

    draw_axes(frame, &geometry, out);
    draw_grids(frame, &geometry, out);
    draw_grid_lines(frame, &geometry, out);
    draw_axis_labels(frame, &geometry, out);
    let outcome = draw_marks(frame, &geometry, None, out);
    if frame.config.legend.show {
        draw_legend(frame, out);
    }
    out.set_interactive_region(area);
    (outcome, geometry)
}

fn numeric_domain(spec: &AxisSpec) -> Option<(f64, f64)> {
    let bounds = spec.domain.as_ref()?;
    let lo = spec.parse_value(bounds.first()?).as_f64()?;
    let hi = spec.parse_value(bounds.get(1)?).as_f64()?;
    Some((lo, hi))
}

fn continuous_kind(kind: ScaleKind) -> ScaleKind {
    if kind.is_discrete() { ScaleKind::Linear } else { kind }
}

/// Scales and series for the plot `area`.
pub fn layout(frame: &Frame<'_>, area: RectF) -> PlotGeometry {
    let config = frame.config;
    let derived = frame.derived;
    let kind = config.kind;
    let series = build_series(derived, &config.x.name, &config.y.name);
    let xs = x_values(derived, &config.x.name);
    let n = xs.len().max(1) as f32;

    let (x, x_width) = if derived.x_scale.is_discrete() {
        let default_padding = if kind == ChartKind::StackedBar { 1.0 - config.style.bar_width } else { 0.0 };
        let padding = config.x.padding.unwrap_or(default_padding);
        let domain = config.x.domain.clone().unwrap_or_else(|| xs.clone());
        let band = BandScale::new(domain, (area.left, area.right), padding, true);
        let step = band.step();
        (XScale::Band(band), step)
    } else {
        let x_width = area.width() / n;
        let range = if kind == ChartKind::Bar {
            (area.left + x_width / 2.0, area.right - x_width / 2.0)
        } else {
            (area.left, area.right)
        };
        let scale_kind = derived.x_scale;
        let domain = numeric_domain(&config.x)
            .or_else(|| extent(xs.iter().filter_map(Datum::as_f64), scale_kind, false))
            .unwrap_or((0.0, 1.0));
        let mut scale = ContinuousScale::new(scale_kind, domain, range);
        if config.x.nice {
            scale = scale.nice(x_tick_count(frame, xs.len()));
        }
        (XScale::Continuous(scale), x_width)
    };

    let y_kind = continuous_kind(derived.y_scale);
    let y_domain = numeric_domain(&config.y).or_else(|| match &derived.stacked {
        Some(stacked) => extent(
            stacked.series.iter().flat_map(|s| s.points.iter().flat_map(|p| [p.baseline, p.top])),
            y_kind,
            true,
        ),
        None => extent(series.iter().flat_map(|s| s.points.iter().map(|p| p.y)), y_kind, kind.is_bar()),
    });
    let mut y = ContinuousScale::new(y_kind, y_domain.unwrap_or((0.0, 1.0)), (area.bottom, area.top));
    if config.y.nice {
        y = y.nice(Y_TICKS);
    }

    let group = (kind == ChartKind::Bar).then(|| {
        let half = x_width / 2.0 * config.style.bar_width;
        BandScale::new(derived.categories.clone(), (-half, half), 0.0, true)
    });

    PlotGeometry { area, x, y, x_values: xs, series, x_width, group, bounds_width: area.width() }
}

fn x_tick_count(frame: &Frame<'_>, n_values: usize) -> usize {
    let by_width = ((frame.width - 100.0) / 100.0).floor().max(1.0) as usize;
    by_width.min(n_values.max(1))
}

/// Pixel y of 0, or of the domain bottom when 0 is not representable (log).
fn y_zero(y: &ContinuousScale) -> f32 {
    if y.kind == ScaleKind::Log { y.to_px(y.vmin) } else { y.to_px(0.0) }
}

fn draw_axes(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let area = g.area;
    let color = frame.theme.axis_line.clone();
    let font_size = frame.font_size() * 0.8;
    let x_ticks = g
        .x
        .ticks(x_tick_count(frame, g.x_values.len()), &frame.derived.x_format)
        .into_iter()
        .map(|(px, label)| (px - area.left, label))
        .collect();
    out.draw_axis(
        Layer::Axes,
        &AxisDraw {
            orient: AxisOrient::Bottom,
            origin: (area.left, area.bottom),
            length: area.width(),
            ticks: x_ticks,
            tick_size: TICK_SIZE,
            color: color.clone(),
            font_size,
        },
    );
    let y_ticks = g
        .y
        .ticks(Y_TICKS)
        .into_iter()
        .map(|t| (g.y.to_px(t) - area.top, frame.derived.y_format.format_f64(t)))
        .collect();
    out.draw_axis(
        Layer::Axes,
        &AxisDraw {
            orient: AxisOrient::Left,
            origin: (area.left, area.top),
            length: area.height(),
            ticks: y_ticks,
            tick_size: TICK_SIZE,
            color: color.clone(),
            font_size,
        },
    );
    // zero line when bars go negative
    if frame.kind() == ChartKind::Bar && g.y.vmin < 0.0 {
        let y0 = g.y.to_px(0.0);
        out.draw_line(Layer::Axes, (area.left, y0), (area.right, y0), &Paint::stroke(color, 1.0));
    }
}

fn draw_grids(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let area = g.area;
    let paint = Paint::stroke(frame.theme.grid.clone(), 1.0).with_opacity(0.5).dashed(2.0, 2.0);
    if frame.config.grid.y.show {
        let count = if g.y.kind == ScaleKind::Log {
            (g.y.vmax.log10() - g.y.vmin.log10()).round().max(1.0) as usize
        } else {
            (area.height() / 40.0).max(1.0) as usize
        };
        for t in g.y.ticks(count).into_iter().skip(1) {
            let py = g.y.to_px(t);
            out.draw_line(Layer::Grid, (area.left, py), (area.right, py), &paint);
        }
    }
    if frame.config.grid.x.show {
        let ticks = g.x.ticks(x_tick_count(frame, g.x_values.len()), &frame.derived.x_format);
        for (px, _) in ticks.into_iter().skip(1) {
            out.draw_line(Layer::Grid, (px, area.top), (px, area.bottom), &paint);
        }
    }
}

fn anchor_of(position: Option<LabelPosition>) -> Anchor {
    match position {
        Some(LabelPosition::Start) => Anchor::Start,
        Some(LabelPosition::End) => Anchor::End,
        Some(LabelPosition::Middle) | None => Anchor::Middle,
    }
}

fn draw_grid_lines(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let area = g.area;
    let color = frame.theme.text.clone();
    let paint = Paint::stroke(color.clone(), 1.0);
    let size = frame.font_size() * 0.8;
    let y_lines: &[GridLine] = &frame.config.grid.y.lines;
    for line in y_lines {
        let Some(v) = frame.config.y.parse_value(&line.value).as_f64() else { continue };
        let py = g.y.to_px(v);
        out.draw_line(Layer::Annotations, (area.left, py), (area.right, py), &paint);
        if let Some(label) = &line.label {
            let px = match line.position {
                Some(LabelPosition::Start) => area.left,
                Some(LabelPosition::End) => area.right,
                _ => area.left + area.width() / 2.0,
            };
            let style = TextStyle::new(size, color.clone()).anchored(anchor_of(line.position));
            out.draw_text(Layer::Annotations, (px, py + size), label, &style);
        }
    }
    for line in &frame.config.grid.x.lines {
        let Some(px) = g.x.center(&frame.config.x.parse_value(&line.value)) else { continue };
        out.draw_line(Layer::Annotations, (px, area.top), (px, area.bottom), &paint);
        if let Some(label) = &line.label {
            let py = match line.position {
                Some(LabelPosition::Start) => area.bottom,
                Some(LabelPosition::End) => area.top,
                _ => area.top + area.height() / 2.0,
            };
            let style = TextStyle::new(size, color.clone()).anchored(anchor_of(line.position)).rotated(-90.0);
            out.draw_text(Layer::Annotations, (px + size, py), label, &style);
        }
    }
}

fn draw_axis_labels(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let area = g.area;
    let size = frame.font_size();
    let style = TextStyle::new(size, frame.theme.text.clone()).anchored(Anchor::Middle);
    if let Some(label) = &frame.config.x.label {
        let py = frame.height - frame.derived.margin.bottom / 2.0 + size * 0.35;
        out.draw_text(Layer::Axes, (area.left + area.width() / 2.0, py), label, &style);
    }
    if let Some(label) = &frame.config.y.label {
        out.draw_text(Layer::Axes, (size, area.top + area.height() / 2.0), label, &style.clone().rotated(-90.0));
    }
}

/// Stroke of one series line, given the currently emphasized category.
pub(crate) fn line_paint(frame: &Frame<'_>, key: &Datum, color: &str, highlight: Option<&Datum>) -> Paint {
    let width = frame.config.style.stroke_width;
    let Some(highlight) = highlight else { return Paint::stroke(color, width) };
    let hit = highlight.key() == key.key();
    match frame.config.style.beautify_closest_line {
        Highlight::Widen if hit => Paint::stroke(color, width + 1.0),
        Highlight::Color if !hit => Paint::stroke(frame.theme.muted.clone(), width),
        _ => Paint::stroke(color, width),
    }
}

/// Marks layer only. Returns `Degraded` when bars cannot fit.
pub fn draw_marks(frame: &Frame<'_>, g: &PlotGeometry, highlight: Option<&Datum>, out: &mut dyn Renderer) -> DrawOutcome {
    out.clear_layer(Layer::Marks);
    let kind = frame.kind();
    let style = &frame.config.style;

    if matches!(kind, ChartKind::Line | ChartKind::DottedLine) {
        for s in &g.series {
            let points: Vec<Point> = s
                .points
                .iter()
                .filter_map(|p| g.x.center(&p.x).map(|px| (px, g.y.to_px(p.y))))
                .collect();
            out.draw_path(Layer::Marks, &points, false, &line_paint(frame, &s.key, &s.color, highlight));
        }
    }
    if matches!(kind, ChartKind::Dot | ChartKind::DottedLine) {
        for s in &g.series {
            let paint = Paint::fill(s.color.clone());
            for p in &s.points {
                if let Some(px) = g.x.center(&p.x) {
                    out.draw_circle(Layer::Marks, (px, g.y.to_px(p.y)), style.dot_size, &paint);
                }
            }
        }
    }
    match kind {
        ChartKind::Bar => return draw_bars(frame, g, out),
        ChartKind::StackedBar => draw_stacked_bars(frame, g, out),
        ChartKind::StackedArea => draw_stacked_areas(frame, g, out),
        _ => {}
    }
    DrawOutcome::Drawn
}

fn draw_bars(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) -> DrawOutcome {
    let Some(group) = &g.group else { return DrawOutcome::Drawn };
    if group.bandwidth() < 1.0 {
        let precondition = RenderPrecondition { message: BAR_WARNING.to_string() };
        warn!(bandwidth = group.bandwidth(), x_values = g.x_values.len(), "bars do not fit the available width");
        draw_warning(frame, g, &precondition.message, out);
        return DrawOutcome::Degraded(precondition);
    }
    let y0 = y_zero(&g.y);
    for s in &g.series {
        let Some(offset) = group.to_px(&s.key) else { continue };
        let paint = Paint::fill(s.color.clone());
        for p in &s.points {
            let Some(px) = g.x.center(&p.x) else { continue };
            let py = g.y.to_px(p.y);
            let top = if p.y > 0.0 { py } else { y0 };
            let rect = RectF::from_ltwh(px + offset, top, group.bandwidth(), (y0 - py).abs());
            out.draw_rect(Layer::Marks, rect, 0.0, &paint);
        }
    }
    DrawOutcome::Drawn
}

fn draw_warning(frame: &Frame<'_>, g: &PlotGeometry, message: &str, out: &mut dyn Renderer) {
    let size = frame.font_size();
    let per_line = (g.area.width() / size).floor().max(1.0) as usize;
    let lines = split_string(message, per_line);
    let style = TextStyle::new(size, "red").weight(700);
    let mid = g.area.top + g.area.height() / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let py = mid + (i as f32 - lines.len() as f32 / 2.0) * 1.1 * size;
        out.draw_text(Layer::Annotations, (g.area.left + 20.0, py), line, &style);
    }
}

/// Left edge and width of the bar slot of one x value.
fn stack_slot(frame: &Frame<'_>, g: &PlotGeometry, x: &Datum) -> Option<(f32, f32)> {
    match &g.x {
        XScale::Band(band) => band.to_px(x).map(|px| (px, band.bandwidth())),
        XScale::Continuous(scale) => {
            let width = g.x_width * frame.config.style.bar_width;
            x.as_f64().map(|v| (scale.to_px(v) - width / 2.0, width))
        }
    }
}

fn draw_stacked_bars(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let Some(stacked) = &frame.derived.stacked else { return };
    for s in &stacked.series {
        let paint = Paint::fill(frame.derived.color_of(&s.key).to_string());
        for p in &s.points {
            if p.top == p.baseline {
                continue;
            }
            let Some((left, width)) = stack_slot(frame, g, &p.x) else { continue };
            let (y_top, y_base) = (g.y.to_px(p.top), g.y.to_px(p.baseline));
            let rect = RectF::from_ltrb(left, y_top.min(y_base), left + width, y_top.max(y_base));
            out.draw_rect(Layer::Marks, rect, 0.0, &paint);
        }
    }
}

fn draw_stacked_areas(frame: &Frame<'_>, g: &PlotGeometry, out: &mut dyn Renderer) {
    let Some(stacked) = &frame.derived.stacked else { return };
    for s in &stacked.series {
        let placed: Vec<(f32, f64, f64)> = s
            .points
            .iter()
            .filter_map(|p| g.x.center(&p.x).map(|px| (px, p.baseline, p.top)))
            .collect();
        let mut outline: Vec<Point> = placed.iter().map(|(px, _, top)| (*px, g.y.to_px(*top))).collect();
        outline.extend(placed.iter().rev().map(|(px, base, _)| (*px, g.y.to_px(*base))));
        let paint = Paint::fill(frame.derived.color_of(&s.key).to_string());
        out.draw_path(Layer::Marks, &outline, true, &paint);
    }
}

fn draw_legend(frame: &Frame<'_>, out: &mut dyn Renderer) {
    let categories = &frame.derived.categories;
    if categories.is_empty() {
        return;
    }
    let legend = &frame.config.legend;
    let margin = frame.derived.margin;
    let size = frame.font_size();
    let x = margin.left + legend.x;
    let y = margin.top + legend.y.unwrap_or(margin.top);
    let labels: Vec<String> = categories.iter().map(|c| frame.category_label(c)).collect();
    let text_width = labels
        .iter()
        .map(|l| frame.host.measure_text(l, size).width)
        .fold(0.0_f32, f32::max);
    let width = text_width + 30.0 + 20.0;
    let height = (categories.len() - 1) as f32 * legend.interstice + size + 10.0;
    let background = legend.background_color.clone().unwrap_or_else(|| frame.theme.background.clone());
    out.draw_rect(
        Layer::Legend,
        RectF::from_ltwh(x - 5.0, y - size * 0.5 - 5.0, width, height),
        0.0,
        &Paint::fill(background).with_opacity(legend.opacity),
    );
    for (i, (category, label)) in categories.iter().zip(&labels).enumerate() {
        let cy = y + i as f32 * legend.interstice;
        let color = frame.derived.color_of(category).to_string();
        out.draw_circle(Layer::Legend, (x + 10.0, cy), 3.0, &Paint::fill(color.clone()));
        out.draw_text(Layer::Legend, (x + 30.0, cy + size * 0.35), label, &TextStyle::new(size, color));
    }
}
