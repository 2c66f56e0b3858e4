// File: crates/grapher-core/src/format.rs
// Summary: Tick/tooltip value formatting (SI prefixes, percent, fixed, time patterns).

use serde::{Deserialize, Serialize};

use crate::datum::Datum;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Declarative replacement for a tick-format callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TickFormat {
    /// Significant digits with an SI prefix (`1.50k`).
    Si { precision: usize },
    /// Value × 100 with a `%` suffix.
    Percent { precision: usize },
    /// Fixed number of decimals.
    Fixed { decimals: usize },
    /// chrono pattern applied to dates (and epoch-millisecond numbers).
    Time { pattern: String },
    /// Display text, unchanged.
    Plain,
}

impl Default for TickFormat {
    fn default() -> Self { TickFormat::Si { precision: 3 } }
}

impl TickFormat {
    pub fn format(&self, value: &Datum) -> String {
        match (self, value) {
            (_, Datum::Null) => String::new(),
            (TickFormat::Time { pattern }, Datum::Date(d)) => d.format(pattern).to_string(),
            (TickFormat::Time { pattern }, Datum::Number(ms)) => match Datum::from_millis(*ms) {
                Some(Datum::Date(d)) => d.format(pattern).to_string(),
                _ => value.to_string(),
            },
            (TickFormat::Si { precision }, Datum::Number(n)) => format_si(*n, *precision),
            (TickFormat::Percent { precision }, Datum::Number(n)) => format!("{:.*}%", *precision, n * 100.0),
            (TickFormat::Fixed { decimals }, Datum::Number(n)) => format!("{:.*}", *decimals, n),
            _ => value.to_string(),
        }
    }

    /// Format a scale-space number (ticks). Time formats read it as epoch milliseconds.
    pub fn format_f64(&self, value: f64) -> String {
        self.format(&Datum::Number(value))
    }
}

/// Format with `precision` significant digits and an SI prefix.
pub fn format_si(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }
    let exponent = value.abs().log10().floor() as i32;
    let mut k = (exponent.div_euclid(3)).clamp(-8, 8);
    let mut scaled = value / 10f64.powi(3 * k);
    let digits = scaled.abs().log10().floor() as i32;
    let mut decimals = (precision as i32 - 1 - digits).max(0) as usize;
    // rounding may carry into the next prefix (999.6 → 1.00k)
    let rounded: f64 = format!("{:.*}", decimals, scaled).parse().unwrap_or(scaled);
    if rounded.abs() >= 1000.0 && k < 8 {
        k += 1;
        scaled = value / 10f64.powi(3 * k);
        decimals = precision - 1;
    }
    format!("{:.*}{}", decimals, scaled, SI_PREFIXES[(k + 8) as usize])
}
