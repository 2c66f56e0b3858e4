// File: crates/grapher-core/tests/snapshot.rs
// Purpose: Golden SVG snapshot harness with bless flow.
// Behavior:
// - Renders small deterministic charts to SVG (approximate text metrics, no fonts involved).
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares text for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

use std::path::PathBuf;
use std::rc::Rc;

use grapher_core::{Chart, ChartKind, ElementInfo, HeadlessHost};
use serde_json::{json, Value};

fn render_svg(kind: ChartKind, config: &Value) -> String {
    let host = Rc::new(
        HeadlessHost::new().with_element("chart", ElementInfo { width: 480.0, height: 300.0, ..ElementInfo::default() }),
    );
    let mut chart = Chart::create(host, "chart", kind, config, None, None).expect("create chart");
    chart.draw(None).expect("draw chart");
    chart.to_svg()
}

fn check_snapshot(name: &str, svg: &str) {
    let snap_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, svg).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), svg.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read_to_string(&snap_path).expect("read snapshot");
        assert_eq!(svg, want, "rendered SVG differs from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_line_chart() {
    let config = json!({
        "data": [
            { "x": 0, "y": 0, "k": "a" }, { "x": 1, "y": 1, "k": "a" }, { "x": 2, "y": 0, "k": "a" },
            { "x": 0, "y": 1.5, "k": "b" }, { "x": 1, "y": 1, "k": "b" }, { "x": 2, "y": 2, "k": "b" },
        ],
        "category": { "name": "k" },
        "y": { "label": "Value" },
    });
    check_snapshot("line_chart.svg", &render_svg(ChartKind::Line, &config));
}

#[test]
fn golden_gauge() {
    check_snapshot("gauge.svg", &render_svg(ChartKind::Gauge, &json!({ "arc": { "value": 72 } })));
}

#[test]
fn rendering_is_deterministic() {
    let config = json!({ "data": [{ "x": 1, "y": 2 }, { "x": 2, "y": 3 }] });
    assert_eq!(render_svg(ChartKind::Bar, &config), render_svg(ChartKind::Bar, &config));
}
