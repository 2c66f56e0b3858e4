// File: crates/grapher-core/src/draw/arc.rs
// Summary: Donut and gauge: background arc, value arc clamped to the angle range, centered value text.

use super::Frame;
use crate::geometry::ArcShape;
use crate::render::{Anchor, Layer, Paint, Renderer, TextStyle};

/// Side of the square the arc is laid out in.
pub fn arc_size(width: f32, height: f32) -> f32 { width.min(height).max(0.0) }

pub fn draw(frame: &Frame<'_>, out: &mut dyn Renderer) {
    let spec = &frame.config.arc;
    let size = arc_size(frame.width, frame.height);
    let start = spec.start_angle.to_radians();
    let end = spec.end_angle.to_radians();
    let base = ArcShape {
        cx: size / 2.0,
        cy: size / 2.0,
        inner_radius: spec.inner_radius_ratio * size,
        outer_radius: spec.outer_radius_ratio * size,
        start_angle: start,
        end_angle: end,
        pad_angle: spec.pad_angle,
        corner_radius: spec.corner_radius_ratio * size,
    };

    let background = spec.background_color.clone().unwrap_or_else(|| frame.theme.blend(0.6));
    out.draw_arc(Layer::Background, &base, &Paint::fill(background));

    // value angle, clamped into [start, end]
    let value_angle = start + (end - start) * spec.ratio();
    if value_angle != start {
        let value = ArcShape { end_angle: value_angle, ..base };
        out.draw_arc(Layer::Marks, &value, &Paint::fill(spec.color_for_value().to_string()));
    }

    if spec.display_value {
        let text = match &spec.value_format {
            Some(format) => format.format_f64(spec.value),
            None => crate::datum::Datum::Number(spec.value).to_string(),
        };
        let font = spec.font_size.unwrap_or(frame.font_size());
        let style = TextStyle::new(font, frame.theme.text.clone()).anchored(Anchor::Middle);
        out.draw_text(Layer::Annotations, (size / 2.0, size / 2.0 + font * 0.35), &text, &style);
    }
}
