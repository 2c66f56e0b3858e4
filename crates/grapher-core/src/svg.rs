// File: crates/grapher-core/src/svg.rs
// Summary: SVG writer implementing Renderer; used for Scene::to_svg and golden snapshots.

use std::fmt::Write as _;

use crate::geometry::{ArcShape, Point, RectF};
use crate::render::{Anchor, Layer, Paint, Renderer, Scene, TextStyle};

/// Segments used to flatten arcs.
const ARC_SEGMENTS: usize = 64;

/// Writes one `<g>` per layer, in paint order.
pub struct SvgRenderer {
    out: String,
    current: Option<Layer>,
}

impl SvgRenderer {
    pub fn new(width: f32, height: f32, background: &str) -> Self {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            num(width),
            num(height),
            num(width),
            num(height)
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, escape(background));
        Self { out, current: None }
    }

    fn enter(&mut self, layer: Layer) {
        if self.current == Some(layer) {
            return;
        }
        if self.current.is_some() {
            self.out.push_str("</g>\n");
        }
        let _ = writeln!(self.out, r#"<g class="{}">"#, layer.as_str());
        self.current = Some(layer);
    }

    pub fn finish(mut self) -> String {
        if self.current.is_some() {
            self.out.push_str("</g>\n");
        }
        self.out.push_str("</svg>\n");
        self.out
    }
}

fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() { format!("{}", rounded as i64) } else { format!("{rounded}") }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn paint_attrs(paint: &Paint) -> String {
    let mut attrs = format!(r#" fill="{}""#, paint.fill.as_deref().map_or("none".to_string(), escape));
    if let Some(stroke) = &paint.stroke {
        let _ = write!(attrs, r#" stroke="{}" stroke-width="{}""#, escape(stroke), num(paint.stroke_width));
    }
    if paint.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, num(paint.opacity));
    }
    if let Some((on, off)) = paint.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{},{}""#, num(on), num(off));
    }
    attrs
}

fn points_attr(points: &[Point]) -> String {
    points.iter().map(|(x, y)| format!("{},{}", num(*x), num(*y))).collect::<Vec<_>>().join(" ")
}

impl Renderer for SvgRenderer {
    fn draw_line(&mut self, layer: Layer, from: Point, to: Point, paint: &Paint) {
        self.enter(layer);
        let _ = writeln!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            paint_attrs(paint)
        );
    }

    fn draw_rect(&mut self, layer: Layer, rect: RectF, radius: f32, paint: &Paint) {
        self.enter(layer);
        let rx = if radius > 0.0 { format!(r#" rx="{}""#, num(radius)) } else { String::new() };
        let _ = writeln!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            num(rect.left),
            num(rect.top),
            num(rect.width()),
            num(rect.height()),
            rx,
            paint_attrs(paint)
        );
    }

    fn draw_circle(&mut self, layer: Layer, center: Point, radius: f32, paint: &Paint) {
        self.enter(layer);
        let _ = writeln!(
            self.out,
            r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
            num(center.0),
            num(center.1),
            num(radius),
            paint_attrs(paint)
        );
    }

    fn draw_arc(&mut self, layer: Layer, arc: &ArcShape, paint: &Paint) {
        self.draw_path(layer, &arc.outline(ARC_SEGMENTS), true, paint);
    }

    fn draw_path(&mut self, layer: Layer, points: &[Point], closed: bool, paint: &Paint) {
        if points.is_empty() {
            return;
        }
        self.enter(layer);
        let tag = if closed { "polygon" } else { "polyline" };
        let _ = writeln!(self.out, r#"<{tag} points="{}"{}/>"#, points_attr(points), paint_attrs(paint));
    }

    fn draw_text(&mut self, layer: Layer, pos: Point, text: &str, style: &TextStyle) {
        self.enter(layer);
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let mut attrs = format!(
            r#" font-size="{}" fill="{}" text-anchor="{anchor}""#,
            num(style.size),
            escape(&style.color)
        );
        if style.weight != 400 {
            let _ = write!(attrs, r#" font-weight="{}""#, style.weight);
        }
        if style.rotate != 0.0 {
            let _ = write!(attrs, r#" transform="rotate({} {} {})""#, num(style.rotate), num(pos.0), num(pos.1));
        }
        let _ = writeln!(self.out, r#"<text x="{}" y="{}"{attrs}>{}</text>"#, num(pos.0), num(pos.1), escape(text));
    }

    fn clear_layer(&mut self, _layer: Layer) {}
}

impl Scene {
    /// Serialize the scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = SvgRenderer::new(self.width, self.height, &self.background);
        self.replay(&mut svg);
        svg.finish()
    }
}
