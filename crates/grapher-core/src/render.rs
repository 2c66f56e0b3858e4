// File: crates/grapher-core/src/render.rs
// Summary: Renderer trait (drawing seam) and the retained Scene that records primitives per layer.

use std::collections::BTreeMap;

use crate::geometry::{ArcShape, Point, RectF};

/// Z-ordered drawing layers; later layers paint over earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Grid,
    Axes,
    Marks,
    Annotations,
    Legend,
    SideText,
    Tooltip,
}

impl Layer {
    pub const ALL: [Layer; 8] = [
        Layer::Background,
        Layer::Grid,
        Layer::Axes,
        Layer::Marks,
        Layer::Annotations,
        Layer::Legend,
        Layer::SideText,
        Layer::Tooltip,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::Grid => "grid",
            Layer::Axes => "axes",
            Layer::Marks => "marks",
            Layer::Annotations => "annotations",
            Layer::Legend => "legend",
            Layer::SideText => "side-text",
            Layer::Tooltip => "tooltip",
        }
    }
}

/// Fill and/or stroke of a shape. Colors are CSS strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub opacity: f32,
    pub dash: Option<(f32, f32)>,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self { fill: Some(color.into()), stroke: None, stroke_width: 0.0, opacity: 1.0, dash: None }
    }

    pub fn stroke(color: impl Into<String>, width: f32) -> Self {
        Self { fill: None, stroke: Some(color.into()), stroke_width: width, opacity: 1.0, dash: None }
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f32) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some((on, off));
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: String,
    pub anchor: Anchor,
    pub weight: u16,
    /// Rotation in degrees around the anchor point.
    pub rotate: f32,
}

impl TextStyle {
    pub fn new(size: f32, color: impl Into<String>) -> Self {
        Self { size, color: color.into(), anchor: Anchor::Start, weight: 400, rotate: 0.0 }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line { from: Point, to: Point, paint: Paint },
    Rect { rect: RectF, radius: f32, paint: Paint },
    Circle { center: Point, radius: f32, paint: Paint },
    Arc { arc: ArcShape, paint: Paint },
    Path { points: Vec<Point>, closed: bool, paint: Paint },
    Text { pos: Point, text: String, style: TextStyle },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// Axis to draw: domain line from `origin` along `length`, ticks at pixel offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisDraw {
    pub orient: AxisOrient,
    pub origin: Point,
    pub length: f32,
    pub ticks: Vec<(f32, String)>,
    pub tick_size: f32,
    pub color: String,
    pub font_size: f32,
}

/// Drawing seam. `Scene` records, `SvgRenderer` writes markup, the Skia crate rasterizes.
pub trait Renderer {
    fn draw_line(&mut self, layer: Layer, from: Point, to: Point, paint: &Paint);
    fn draw_rect(&mut self, layer: Layer, rect: RectF, radius: f32, paint: &Paint);
    fn draw_circle(&mut self, layer: Layer, center: Point, radius: f32, paint: &Paint);
    fn draw_arc(&mut self, layer: Layer, arc: &ArcShape, paint: &Paint);
    fn draw_path(&mut self, layer: Layer, points: &[Point], closed: bool, paint: &Paint);
    fn draw_text(&mut self, layer: Layer, pos: Point, text: &str, style: &TextStyle);

    /// Domain line, tick marks and tick labels.
    fn draw_axis(&mut self, layer: Layer, axis: &AxisDraw) {
        let paint = Paint::stroke(axis.color.clone(), 1.0);
        let (ox, oy) = axis.origin;
        match axis.orient {
            AxisOrient::Bottom => {
                self.draw_line(layer, (ox, oy), (ox + axis.length, oy), &paint);
                let style = TextStyle::new(axis.font_size, axis.color.clone()).anchored(Anchor::Middle);
                for (px, label) in &axis.ticks {
                    let x = ox + px;
                    self.draw_line(layer, (x, oy), (x, oy + axis.tick_size), &paint);
                    self.draw_text(layer, (x, oy + axis.tick_size + axis.font_size), label, &style);
                }
            }
            AxisOrient::Left => {
                self.draw_line(layer, (ox, oy), (ox, oy + axis.length), &paint);
                let style = TextStyle::new(axis.font_size, axis.color.clone()).anchored(Anchor::End);
                for (py, label) in &axis.ticks {
                    let y = oy + py;
                    self.draw_line(layer, (ox - axis.tick_size, y), (ox, y), &paint);
                    self.draw_text(layer, (ox - axis.tick_size - 3.0, y + axis.font_size * 0.35), label, &style);
                }
            }
        }
    }

    /// Region receiving pointer events (the "attach handlers" capability).
    fn set_interactive_region(&mut self, _rect: RectF) {}

    fn clear_layer(&mut self, layer: Layer);
}

/// Retained scene: primitives per layer plus the interactive region.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: String,
    layers: BTreeMap<Layer, Vec<Primitive>>,
    interactive: Option<RectF>,
}

impl Scene {
    pub fn new(width: f32, height: f32, background: impl Into<String>) -> Self {
        Self { width, height, background: background.into(), layers: BTreeMap::new(), interactive: None }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn layer(&self, layer: Layer) -> &[Primitive] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn interactive_region(&self) -> Option<RectF> { self.interactive }

    pub fn is_empty(&self) -> bool { self.layers.values().all(Vec::is_empty) }

    pub fn len(&self) -> usize { self.layers.values().map(Vec::len).sum() }

    /// Remove every primitive and the interactive region.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.interactive = None;
    }

    /// All text content, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.layers
            .values()
            .flatten()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, layer: Layer, primitive: Primitive) {
        self.layers.entry(layer).or_default().push(primitive);
    }

    /// Replay every layer, bottom to top, into another renderer.
    pub fn replay(&self, target: &mut dyn Renderer) {
        for (layer, items) in &self.layers {
            for item in items {
                match item {
                    Primitive::Line { from, to, paint } => target.draw_line(*layer, *from, *to, paint),
                    Primitive::Rect { rect, radius, paint } => target.draw_rect(*layer, *rect, *radius, paint),
                    Primitive::Circle { center, radius, paint } => target.draw_circle(*layer, *center, *radius, paint),
                    Primitive::Arc { arc, paint } => target.draw_arc(*layer, arc, paint),
                    Primitive::Path { points, closed, paint } => target.draw_path(*layer, points, *closed, paint),
                    Primitive::Text { pos, text, style } => target.draw_text(*layer, *pos, text, style),
                }
            }
        }
        if let Some(rect) = self.interactive {
            target.set_interactive_region(rect);
        }
    }
}

impl Renderer for Scene {
    fn draw_line(&mut self, layer: Layer, from: Point, to: Point, paint: &Paint) {
        self.push(layer, Primitive::Line { from, to, paint: paint.clone() });
    }

    fn draw_rect(&mut self, layer: Layer, rect: RectF, radius: f32, paint: &Paint) {
        self.push(layer, Primitive::Rect { rect, radius, paint: paint.clone() });
    }

    fn draw_circle(&mut self, layer: Layer, center: Point, radius: f32, paint: &Paint) {
        self.push(layer, Primitive::Circle { center, radius, paint: paint.clone() });
    }

    fn draw_arc(&mut self, layer: Layer, arc: &ArcShape, paint: &Paint) {
        self.push(layer, Primitive::Arc { arc: *arc, paint: paint.clone() });
    }

    fn draw_path(&mut self, layer: Layer, points: &[Point], closed: bool, paint: &Paint) {
        self.push(layer, Primitive::Path { points: points.to_vec(), closed, paint: paint.clone() });
    }

    fn draw_text(&mut self, layer: Layer, pos: Point, text: &str, style: &TextStyle) {
        self.push(layer, Primitive::Text { pos, text: text.to_string(), style: style.clone() });
    }

    fn set_interactive_region(&mut self, rect: RectF) { self.interactive = Some(rect); }

    fn clear_layer(&mut self, layer: Layer) {
        self.layers.remove(&layer);
    }
}
