// File: crates/grapher-render-skia/src/lib.rs
// Summary: Skia raster backend: replays grapher scenes onto a CPU surface, encodes PNG, measures text.

use anyhow::{Context, Result};
use tracing::debug;
use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle as SkTextStyle};

use grapher_core::geometry::{ArcShape, Point, RectF};
use grapher_core::render::{Anchor, Layer, Paint, Renderer, Scene, TextStyle};
use grapher_core::text::{TextMeasure, TextSize};
use grapher_core::theme::parse_color;

/// Segments used to flatten arcs.
const ARC_SEGMENTS: usize = 96;

/// Paragraph-based text layout shared by drawing and measurement.
pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color, weight: u16) -> SkTextStyle {
        let mut ts = SkTextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);
        let font_style = if weight >= 600 { skia::FontStyle::bold() } else { skia::FontStyle::normal() };
        ts.set_font_style(font_style);
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color, weight: u16) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color, weight));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }
}

/// Real font metrics for hosts that render through Skia.
#[derive(Default)]
pub struct SkiaTextMeasure {
    shaper: TextShaper,
}

impl TextMeasure for SkiaTextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        let p = self.shaper.layout(text, font_size, skia::Color::TRANSPARENT, 400);
        // width of the longest line
        TextSize { width: p.longest_line(), height: p.height() }
    }
}

fn to_color(css: &str, opacity: f32) -> skia::Color {
    let c = parse_color(css).unwrap_or(grapher_core::Rgba::BLACK);
    let alpha = (c.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(alpha, c.r, c.g, c.b)
}

fn fill_paint(color: &str, opacity: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(to_color(color, opacity));
    paint
}

fn stroke_paint(color: &str, width: f32, opacity: f32, dash: Option<(f32, f32)>) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width.max(0.5));
    paint.set_color(to_color(color, opacity));
    if let Some((on, off)) = dash {
        paint.set_path_effect(skia::PathEffect::dash(&[on, off], 0.0));
    }
    paint
}

fn rect(r: RectF) -> skia::Rect { skia::Rect::from_ltrb(r.left, r.top, r.right, r.bottom) }

fn polyline(points: &[Point], closed: bool) -> skia::Path {
    let mut path = skia::Path::new();
    if let Some((&first, rest)) = points.split_first() {
        path.move_to(first);
        for &p in rest {
            path.line_to(p);
        }
        if closed {
            path.close();
        }
    }
    path
}

/// Renderer drawing straight onto a Skia canvas.
pub struct SkiaRenderer<'a> {
    canvas: &'a skia::Canvas,
    shaper: &'a TextShaper,
}

impl<'a> SkiaRenderer<'a> {
    pub fn new(canvas: &'a skia::Canvas, shaper: &'a TextShaper) -> Self { Self { canvas, shaper } }

    fn paint_shape(&self, p: &Paint, draw: impl Fn(&skia::Canvas, &skia::Paint)) {
        if let Some(fill) = &p.fill {
            draw(self.canvas, &fill_paint(fill, p.opacity));
        }
        if let Some(stroke) = &p.stroke {
            draw(self.canvas, &stroke_paint(stroke, p.stroke_width, p.opacity, p.dash));
        }
    }
}

impl Renderer for SkiaRenderer<'_> {
    fn draw_line(&mut self, _layer: Layer, from: Point, to: Point, paint: &Paint) {
        let color = paint.stroke.as_deref().or(paint.fill.as_deref()).unwrap_or("#000");
        let stroke = stroke_paint(color, paint.stroke_width.max(1.0), paint.opacity, paint.dash);
        self.canvas.draw_line(from, to, &stroke);
    }

    fn draw_rect(&mut self, _layer: Layer, r: RectF, radius: f32, paint: &Paint) {
        self.paint_shape(paint, |canvas, p| {
            if radius > 0.0 {
                canvas.draw_round_rect(rect(r), radius, radius, p);
            } else {
                canvas.draw_rect(rect(r), p);
            }
        });
    }

    fn draw_circle(&mut self, _layer: Layer, center: Point, radius: f32, paint: &Paint) {
        self.paint_shape(paint, |canvas, p| {
            canvas.draw_circle(center, radius, p);
        });
    }

    fn draw_arc(&mut self, layer: Layer, arc: &ArcShape, paint: &Paint) {
        self.draw_path(layer, &arc.outline(ARC_SEGMENTS), true, paint);
    }

    fn draw_path(&mut self, _layer: Layer, points: &[Point], closed: bool, paint: &Paint) {
        let path = polyline(points, closed);
        self.paint_shape(paint, |canvas, p| {
            canvas.draw_path(&path, p);
        });
    }

    fn draw_text(&mut self, _layer: Layer, pos: Point, text: &str, style: &TextStyle) {
        let mut p = self.shaper.layout(text, style.size, to_color(&style.color, 1.0), style.weight);
        let width = p.longest_line();
        let x = match style.anchor {
            Anchor::Start => pos.0,
            Anchor::Middle => pos.0 - width / 2.0,
            Anchor::End => pos.0 - width,
        };
        self.canvas.save();
        if style.rotate != 0.0 {
            self.canvas.rotate(style.rotate, Some(skia::Point::new(pos.0, pos.1)));
        }
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(self.canvas, (x, pos.1 - style.size * 0.8));
        self.canvas.restore();
    }

    fn clear_layer(&mut self, _layer: Layer) {}
}

/// Rasterize `scene` on a CPU surface and encode it as PNG.
pub fn render_png(scene: &Scene) -> Result<Vec<u8>> {
    let width = scene.width.ceil().max(1.0) as i32;
    let height = scene.height.ceil().max(1.0) as i32;
    let mut surface = skia::surfaces::raster_n32_premul((width, height))
        .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
    let shaper = TextShaper::new();
    {
        let canvas = surface.canvas();
        canvas.clear(to_color(&scene.background, 1.0));
        let mut renderer = SkiaRenderer::new(canvas, &shaper);
        scene.replay(&mut renderer);
    }
    debug!(width, height, primitives = scene.len(), "scene rasterized");
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Render to a PNG file, creating parent directories.
pub fn render_png_file(scene: &Scene, path: impl AsRef<std::path::Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = render_png(scene)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
