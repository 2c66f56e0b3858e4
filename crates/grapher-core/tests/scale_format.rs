// File: crates/grapher-core/tests/scale_format.rs
// Purpose: Scales, tick layout, value formatting, color parsing and text helpers.

use grapher_core::format::format_si;
use grapher_core::grid::{nice, ticks};
use grapher_core::scale::{extent, BandScale, ContinuousScale};
use grapher_core::text::split_string;
use grapher_core::theme::barycenter_color;
use grapher_core::{parse_color, Datum, ParseFn, Rgba, ScaleKind, Theme, TickFormat, TimeUnit};

#[test]
fn linear_scale_maps_and_inverts() {
    let s = ContinuousScale::linear((0.0, 10.0), (100.0, 0.0));
    assert_eq!(s.to_px(0.0), 100.0);
    assert_eq!(s.to_px(10.0), 0.0);
    assert!((s.from_px(25.0) - 7.5).abs() < 1e-9);
}

#[test]
fn degenerate_domain_is_widened() {
    let s = ContinuousScale::linear((5.0, 5.0), (0.0, 100.0));
    assert_eq!(s.domain(), (5.0, 6.0));
}

#[test]
fn log_scale_uses_powers_of_ten() {
    let s = ContinuousScale::new(ScaleKind::Log, (3.0, 4000.0), (0.0, 300.0)).nice(10);
    assert_eq!(s.domain(), (1.0, 10000.0));
    assert_eq!(s.ticks(10), vec![1.0, 10.0, 100.0, 1000.0, 10000.0]);
    assert!((s.to_px(100.0) - 150.0).abs() < 1e-3);
}

#[test]
fn nice_extends_to_round_bounds() {
    assert_eq!(nice(0.3, 9.7, 10), (0.0, 10.0));
    assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn extent_handles_zero_and_log() {
    assert_eq!(extent([3.0, 7.0], ScaleKind::Linear, true), Some((0.0, 7.0)));
    assert_eq!(extent([-2.0, 0.0, 5.0], ScaleKind::Log, false), Some((5.0, 5.0)));
    assert_eq!(extent([f64::NAN], ScaleKind::Linear, false), None);
}

#[test]
fn band_scale_splits_range() {
    let domain: Vec<Datum> = ["a", "b", "c", "d"].into_iter().map(Datum::from).collect();
    let band = BandScale::new(domain, (0.0, 400.0), 0.2, false);
    assert!((band.step() - 400.0 / 4.0).abs() < 1e-3);
    assert!((band.bandwidth() - 80.0).abs() < 1e-3);
    assert_eq!(band.to_px(&"a".into()), Some(10.0));
    assert_eq!(band.index_at(215.0), Some(2));
    assert_eq!(band.to_px(&"zz".into()), None);
}

#[test]
fn si_format_uses_prefixes() {
    assert_eq!(format_si(1500.0, 3), "1.50k");
    assert_eq!(format_si(0.0, 3), "0.00");
    assert_eq!(format_si(999.6, 3), "1.00k");
    assert_eq!(format_si(-2_500_000.0, 2), "-2.5M");
    assert_eq!(format_si(0.042, 3), "42.0m");
}

#[test]
fn tick_formats() {
    assert_eq!(TickFormat::Percent { precision: 1 }.format_f64(0.256), "25.6%");
    assert_eq!(TickFormat::Fixed { decimals: 2 }.format_f64(3.14159), "3.14");
    assert_eq!(TickFormat::Plain.format(&Datum::from("q1")), "q1");
    assert_eq!(TickFormat::default().format(&Datum::Null), "");
    let time = TickFormat::Time { pattern: "%Y-%m".into() };
    assert_eq!(time.format_f64(1_700_000_000_000.0), "2023-11");
}

#[test]
fn parsers_convert_values() {
    assert_eq!(ParseFn::Number.apply(&Datum::from(" 4.5 "), None), Datum::Number(4.5));
    assert_eq!(ParseFn::Number.apply(&Datum::from("n/a"), None), Datum::Null);
    assert_eq!(ParseFn::Text.apply(&Datum::Number(3.0), None), Datum::from("3"));
    let ts = ParseFn::Timestamp { unit: TimeUnit::Seconds }.apply(&Datum::Number(86_400.0), None);
    assert_eq!(ts.to_string(), "1970-01-02");
    let date = ParseFn::Date { format: None }.apply(&Datum::from("03/2024"), Some("%d/%m/%Y"));
    assert!(date.is_null());
    let date = ParseFn::Date { format: Some("%d/%m/%Y".into()) }.apply(&Datum::from("05/03/2024"), None);
    assert_eq!(date.to_string(), "2024-03-05");
    // parsing a parsed value is a no-op
    assert_eq!(ParseFn::Date { format: None }.apply(&date, None), date);
}

#[test]
fn colors_parse_and_blend() {
    assert_eq!(parse_color("#f00"), Some(Rgba::rgb(255, 0, 0)));
    assert_eq!(parse_color("rgba(0, 0, 0, 0)"), Some(Rgba::TRANSPARENT));
    assert_eq!(parse_color("#11223380").map(|c| c.a), Some(0x80));
    assert_eq!(parse_color("nonsense"), None);
    assert_eq!(barycenter_color("#000000", "#ffffff", 0.2), "#cccccc");
    assert_eq!(Rgba::rgb(10, 20, 30).with_opacity(0.5).to_string(), "rgba(10,20,30,0.502)");
}

#[test]
fn theme_reads_transparent_background_as_white() {
    let theme = Theme::from_style("rgb(20, 20, 20)", "rgba(0, 0, 0, 0)", 14.0);
    assert_eq!(theme.background, "#ffffff");
    assert_eq!(theme.text, "#141414");
    assert_eq!(theme.font_size, 14.0);
}

#[test]
fn split_string_wraps_on_words() {
    assert_eq!(split_string("too many bars to draw", 8), ["too many", "bars to", "draw"]);
    assert_eq!(split_string("unbreakableword", 4), ["unbreakableword"]);
    assert!(split_string("   ", 5).is_empty());
}
