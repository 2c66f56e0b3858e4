// File: crates/grapher-demo/src/main.rs
// Summary: Demo loads a long-format CSV (x, y[, category]) and renders every chart kind to SVG and PNG.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use grapher_core::{Chart, ChartKind, ElementInfo, HeadlessHost, Host};
use grapher_render_skia::{render_png_file, SkiaTextMeasure};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONTAINER: &str = "chart";

/// Columns the charts are configured with.
struct Fields {
    x: String,
    y: String,
    category: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next();
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "target/out".to_string()));

    let (rows, fields) = match input {
        Some(raw) => {
            let (path, used_alt) = resolve_path(&raw)?;
            info!(path = %path.display(), used_alt, "using input file");
            load_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
        None => {
            info!("no input file given; using built-in sample data");
            sample_data()
        }
    };
    if rows.is_empty() {
        anyhow::bail!("no rows loaded; check headers/delimiter.");
    }
    info!(rows = rows.len(), x = %fields.x, y = %fields.y, category = ?fields.category, "data loaded");

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let host: Rc<dyn Host> = Rc::new(
        HeadlessHost::new()
            .with_element(CONTAINER, ElementInfo { width: 800.0, height: 450.0, ..ElementInfo::default() })
            .with_download_dir(&out_dir)
            .with_text_measure(Box::new(SkiaTextMeasure::default())),
    );

    for kind in ChartKind::ALL {
        if kind.is_stacked() && fields.category.is_none() {
            warn!(%kind, "skipped: stacked charts need a category column");
            continue;
        }
        let config = config_for(kind, &rows, &fields);
        let mut chart = Chart::create(Rc::clone(&host), CONTAINER, kind, &config, None, None)?;
        let outcome = chart.draw(None)?;
        if outcome.is_degraded() {
            warn!(%kind, ?outcome, "chart degraded");
        }

        let svg_path = out_dir.join(format!("chart_{kind}.svg"));
        std::fs::write(&svg_path, chart.to_svg()).with_context(|| format!("writing {}", svg_path.display()))?;
        let png_path = svg_path.with_extension("png");
        render_png_file(chart.scene(), &png_path)?;
        info!(%kind, svg = %svg_path.display(), png = %png_path.display(), "wrote chart");

        if kind == ChartKind::Line {
            let filename = chart.export_csv(Some("chart_line_data.csv"))?;
            info!(filename = %filename, "exported data");
        }
    }
    Ok(())
}

fn config_for(kind: ChartKind, rows: &[Value], fields: &Fields) -> Value {
    if kind.is_arc() {
        let last = rows
            .last()
            .and_then(|r| r.get(&fields.y))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let max = rows
            .iter()
            .filter_map(|r| r.get(&fields.y).and_then(Value::as_f64))
            .fold(0.0_f64, f64::max);
        return json!({ "arc": { "value": last, "minValue": 0, "maxValue": if max > 0.0 { max } else { 100.0 } } });
    }
    let mut config = json!({
        "data": rows,
        "x": { "name": fields.x },
        "y": { "name": fields.y },
    });
    if let Some(category) = &fields.category {
        config["category"] = json!({ "name": category });
    }
    config
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

/// Load a CSV into JSON rows. The first three columns are x, y and (optionally) category.
fn load_csv(path: &Path) -> Result<(Vec<Value>, Fields)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    info!(?headers, "headers");
    if headers.len() < 2 {
        anyhow::bail!("expected at least two columns (x, y), found {}", headers.len());
    }
    let fields = Fields { x: headers[0].clone(), y: headers[1].clone(), category: headers.get(2).cloned() };

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut row = Map::new();
        for (name, cell) in headers.iter().zip(rec.iter()) {
            row.insert(name.clone(), cell_value(cell));
        }
        out.push(Value::Object(row));
    }
    Ok((out, fields))
}

/// Numbers stay numbers; everything else is kept as text, empty cells become null.
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell.parse::<f64>() {
        Ok(n) => json!(n),
        Err(_) => Value::String(cell.to_string()),
    }
}

fn sample_data() -> (Vec<Value>, Fields) {
    let series = [("north", 1.0_f64), ("south", -0.5), ("west", 0.25)];
    let rows = (0..24)
        .flat_map(|i| {
            let t = i as f64;
            series.iter().map(move |&(name, phase)| {
                json!({ "month": t, "sales": ((t / 4.0 + phase).sin() * 40.0 + 50.0).round(), "region": name })
            })
        })
        .collect();
    (rows, Fields { x: "month".into(), y: "sales".into(), category: Some("region".into()) })
}
