// File: crates/grapher-render-skia/tests/render.rs
// Purpose: Rasterize grapher scenes with Skia and validate the decoded PNG.

use std::rc::Rc;

use grapher_core::text::TextMeasure;
use grapher_core::{Chart, ChartKind, ElementInfo, HeadlessHost, Layer, Paint, Renderer, Scene};
use grapher_render_skia::{render_png, render_png_file, SkiaTextMeasure};
use serde_json::json;

#[test]
fn background_fills_the_surface() {
    let scene = Scene::new(40.0, 20.0, "#102030");
    let bytes = render_png(&scene).expect("png");
    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(img.dimensions(), (40, 20));
    assert_eq!(img.get_pixel(0, 0).0, [0x10, 0x20, 0x30, 255]);
}

#[test]
fn filled_rect_is_painted() {
    let mut scene = Scene::new(20.0, 20.0, "#ffffff");
    scene.draw_rect(
        Layer::Marks,
        grapher_core::geometry::RectF::from_ltwh(5.0, 5.0, 10.0, 10.0),
        0.0,
        &Paint::fill("#ff0000"),
    );
    let bytes = render_png(&scene).expect("png");
    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
}

#[test]
fn chart_scene_renders_to_file() {
    let host = Rc::new(
        HeadlessHost::new()
            .with_element("c", ElementInfo { width: 320.0, height: 200.0, ..ElementInfo::default() })
            .with_text_measure(Box::new(SkiaTextMeasure::default())),
    );
    let config = json!({
        "data": [{ "x": 1, "y": 3 }, { "x": 2, "y": 1 }, { "x": 3, "y": 4 }],
        "x": { "label": "t" },
    });
    let mut chart = Chart::create(host, "c", ChartKind::DottedLine, &config, None, None).expect("create");
    chart.draw(None).expect("draw");

    let path = std::path::PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("dotted_line.png");
    render_png_file(chart.scene(), &path).expect("write png");
    let img = image::open(&path).expect("open png").to_rgba8();
    assert_eq!(img.dimensions(), (320, 200));
}

#[test]
fn skia_measure_grows_with_text() {
    let m = SkiaTextMeasure::default();
    let short = m.measure("ab", 16.0);
    let long = m.measure("abcdefgh", 16.0);
    assert!(long.width >= short.width);
    assert!(short.height > 0.0 || short.width == 0.0, "no fonts available is tolerated");
}
