// File: crates/grapher-core/src/tooltip.rs
// Summary: Pointer hit-testing (nearest x value), tooltip content/layout and closest-series emphasis.

use crate::config::Highlight;
use crate::datum::{Datum, Row};
use crate::draw::{Frame, PlotGeometry};
use crate::geometry::{Point, RectF};
use crate::render::{Layer, Paint, Renderer, TextStyle};
use crate::scale::XScale;

/// Line height of tooltip text, in font sizes.
const LINE_HEIGHT: f32 = 1.1;

/// One row shown in the tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    pub category: Datum,
    pub y: Option<f64>,
    pub color: String,
    pub row: Row,
}

/// Result of the last pointer event over the plot.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipHit {
    pub x_value: Datum,
    /// Pixel x of the snapped value.
    pub x_px: f32,
    pub pointer: Point,
    /// Rows at `x_value`, largest y first.
    pub rows: Vec<TooltipRow>,
    /// Series closest to the pointer, when the kind draws lines.
    pub highlight: Option<Datum>,
    pub lines: Vec<String>,
    /// Box around the text, in scene coordinates.
    pub rect: RectF,
    /// Top-left of the first text line.
    pub text_origin: Point,
}

/// Closest x value to pixel `px`: bisect the sorted values, keep the nearer neighbour.
pub fn nearest_x(geometry: &PlotGeometry, px: f32) -> Option<Datum> {
    match &geometry.x {
        XScale::Band(band) => {
            let half = band.bandwidth() / 2.0;
            band.index_at(px - half).and_then(|i| band.domain().get(i).cloned())
        }
        XScale::Continuous(scale) => {
            let mut values: Vec<(f64, &Datum)> =
                geometry.x_values.iter().filter_map(|d| d.as_f64().map(|v| (v, d))).collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(|a, b| a.0.total_cmp(&b.0));
            let target = scale.from_px(px);
            let i = values.partition_point(|(v, _)| *v < target);
            let a = values[i.saturating_sub(1)];
            let b = values[i.min(values.len() - 1)];
            let pick = if target - a.0 > b.0 - target { b } else { a };
            Some(pick.1.clone())
        }
    }
}

/// Tooltip for a pointer at `pointer` (scene coordinates), or `None` when nothing is under it.
pub fn hit(frame: &Frame<'_>, geometry: &PlotGeometry, pointer: Point) -> Option<TooltipHit> {
    let config = frame.config;
    let derived = frame.derived;
    let x_value = nearest_x(geometry, pointer.0)?;
    let x_px = geometry.x.center(&x_value)?;
    let key = x_value.key();

    let mut rows: Vec<TooltipRow> = derived
        .parsed_data
        .iter()
        .filter(|r| r.get(&config.x.name).is_some_and(|x| x.key() == key))
        .map(|r| {
            let category = derived.category_of(r);
            TooltipRow {
                color: derived.color_of(&category).to_string(),
                y: r.get(&config.y.name).and_then(Datum::as_f64),
                category,
                row: r.clone(),
            }
        })
        .collect();
    rows.sort_by(|a, b| match (a.y, b.y) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let highlight = if config.kind.has_lines() && config.style.beautify_closest_line != Highlight::None {
        let target = geometry.y.from_px(pointer.1);
        rows.iter()
            .filter_map(|r| r.y.map(|y| ((y - target).abs(), &r.category)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, c)| c.clone())
    } else {
        None
    };

    let sparkline = config.kind.is_sparkline();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    if !sparkline {
        lines.push(derived.x_format.format(&x_value));
    }
    for r in &rows {
        let value = r.y.map(|y| derived.y_format.format_f64(y)).unwrap_or_default();
        if sparkline {
            lines.push(value);
        } else {
            lines.push(format!("{}: {}", frame.category_label(&r.category), value));
        }
    }

    let size = tooltip_font_size(frame);
    let w = lines.iter().map(|l| frame.host.measure_text(l, size).width).fold(0.0_f32, f32::max);
    let h = lines.len() as f32 * LINE_HEIGHT * size;
    let area = geometry.area;
    let mx = x_px - area.left;
    let my = pointer.1 - area.top;
    let inner_h = area.height();
    let (rect, text_origin) = if sparkline {
        let tx = if w + mx > geometry.bounds_width { mx - w } else { mx };
        let ty = if my - 5.0 < 0.0 {
            my + 5.0
        } else if my + h > inner_h {
            inner_h - h
        } else {
            my
        };
        (RectF::from_ltwh(area.left + tx, area.top + ty - 11.0, w, h), (area.left + tx, area.top + ty))
    } else {
        let tx = if w + mx + 10.0 > geometry.bounds_width { mx - w - 10.0 } else { mx + 10.0 };
        let ty = if my - 20.0 < 0.0 {
            my + 20.0
        } else if my + h - 10.0 > inner_h {
            inner_h - h + 10.0
        } else {
            my
        };
        (
            RectF::from_ltwh(area.left + tx - 5.0, area.top + ty - 20.0, w + 10.0, h + 10.0),
            (area.left + tx, area.top + ty),
        )
    };

    Some(TooltipHit { x_value, x_px, pointer, rows, highlight, lines, rect, text_origin })
}

fn tooltip_font_size(frame: &Frame<'_>) -> f32 {
    if frame.kind().is_sparkline() {
        frame.font_size() * frame.config.sparkline.text_font_scale
    } else {
        frame.font_size()
    }
}

/// Draw the tooltip layer: guide line, dots, box and text.
pub fn draw(frame: &Frame<'_>, geometry: &PlotGeometry, hit: &TooltipHit, out: &mut dyn Renderer) {
    out.clear_layer(Layer::Tooltip);
    let style = &frame.config.style;
    let area = geometry.area;
    let line_color = style.tooltip_line_color.clone().unwrap_or_else(|| frame.theme.text.clone());
    out.draw_line(Layer::Tooltip, (hit.x_px, area.top), (hit.x_px, area.bottom), &Paint::stroke(line_color, 1.0));

    let kind = frame.kind();
    if !kind.is_bar() && !kind.is_stacked() {
        for r in &hit.rows {
            let Some(y) = r.y else { continue };
            let color = if kind.is_sparkline() { frame.config.sparkline.circle_color.clone() } else { r.color.clone() };
            out.draw_circle(Layer::Tooltip, (hit.x_px, geometry.y.to_px(y)), style.tooltip_dot_size, &Paint::fill(color));
        }
    }

    let background = style.tooltip_background_color.clone().unwrap_or_else(|| frame.theme.background.clone());
    out.draw_rect(Layer::Tooltip, hit.rect, 5.0, &Paint::fill(background).with_opacity(style.tooltip_opacity));

    let size = tooltip_font_size(frame);
    let header_color = style.tooltip_color.clone().unwrap_or_else(|| frame.theme.text.clone());
    let has_header = !kind.is_sparkline();
    for (i, line) in hit.lines.iter().enumerate() {
        let color = match (has_header, i) {
            (true, 0) => header_color.clone(),
            (true, i) => hit.rows.get(i - 1).map_or(header_color.clone(), |r| r.color.clone()),
            (false, _) => header_color.clone(),
        };
        let pos = (hit.text_origin.0, hit.text_origin.1 + i as f32 * LINE_HEIGHT * size);
        out.draw_text(Layer::Tooltip, pos, line, &TextStyle::new(size, color).weight(700));
    }
}
