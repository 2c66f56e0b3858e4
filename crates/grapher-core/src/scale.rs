// File: crates/grapher-core/src/scale.rs
// Summary: Continuous (linear/log/time) and band scales mapping data to pixels.

use crate::axis::ScaleKind;
use crate::datum::Datum;
use crate::format::TickFormat;
use crate::grid;

/// Maps a numeric domain onto a pixel range. Time scales work on epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousScale {
    pub kind: ScaleKind,
    pub vmin: f64,
    pub vmax: f64,
    pub range: (f32, f32),
    // cached log endpoints when kind is Log
    log_min: f64,
    log_max: f64,
}

impl ContinuousScale {
    pub fn new(kind: ScaleKind, (mut vmin, mut vmax): (f64, f64), range: (f32, f32)) -> Self {
        if kind == ScaleKind::Log {
            // Ensure strictly positive range for log scale
            let eps = 1e-12;
            vmin = if vmin <= eps { eps } else { vmin };
            vmax = if vmax <= vmin { vmin * 10.0 } else { vmax };
            return Self { kind, vmin, vmax, range, log_min: vmin.log10(), log_max: vmax.log10() };
        }
        if (vmax - vmin).abs() < 1e-12 {
            vmax = vmin + 1.0;
        }
        Self { kind, vmin, vmax, range, log_min: 0.0, log_max: 0.0 }
    }

    pub fn linear(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self::new(ScaleKind::Linear, domain, range)
    }

    pub fn domain(&self) -> (f64, f64) { (self.vmin, self.vmax) }

    fn fraction(&self, v: f64) -> f64 {
        if self.kind == ScaleKind::Log {
            let span = (self.log_max - self.log_min).max(1e-12);
            (v.max(1e-12).log10() - self.log_min) / span
        } else {
            (v - self.vmin) / (self.vmax - self.vmin)
        }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let (r0, r1) = self.range;
        r0 + self.fraction(v) as f32 * (r1 - r0)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let (r0, r1) = self.range;
        let span_px = r1 - r0;
        let t = if span_px.abs() < f32::EPSILON { 0.0 } else { ((px - r0) / span_px) as f64 };
        if self.kind == ScaleKind::Log {
            10f64.powf(self.log_min + t * (self.log_max - self.log_min))
        } else {
            self.vmin + t * (self.vmax - self.vmin)
        }
    }

    /// Extend the domain to round values (powers of ten for log scales).
    pub fn nice(self, count: usize) -> Self {
        if self.kind == ScaleKind::Log {
            let lo = 10f64.powf(self.log_min.floor());
            let hi = 10f64.powf(self.log_max.ceil());
            return Self::new(self.kind, (lo, hi), self.range);
        }
        Self::new(self.kind, grid::nice(self.vmin, self.vmax, count), self.range)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if self.kind == ScaleKind::Log {
            let lo = self.log_min.ceil() as i32;
            let hi = self.log_max.floor() as i32;
            return (lo..=hi).map(|e| 10f64.powi(e)).collect();
        }
        grid::ticks(self.vmin, self.vmax, count)
    }
}

/// Discrete scale splitting the range into equal bands, one per domain value.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<Datum>,
    keys: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    /// `padding` is the inner padding share of each step; outer padding is half of it.
    pub fn new(domain: Vec<Datum>, (r0, r1): (f32, f32), padding: f32, round: bool) -> Self {
        let n = domain.len() as f32;
        let inner = padding.clamp(0.0, 0.99);
        let outer = inner / 2.0;
        let mut step = (r1 - r0) / (n - inner + 2.0 * outer).max(1.0);
        if round {
            step = step.floor();
        }
        let mut start = r0 + (r1 - r0 - step * (n - inner)) * 0.5;
        let mut bandwidth = step * (1.0 - inner);
        if round {
            start = start.round();
            bandwidth = bandwidth.round();
        }
        let keys = domain.iter().map(Datum::key).collect();
        Self { domain, keys, start, step, bandwidth }
    }

    pub fn domain(&self) -> &[Datum] { &self.domain }
    pub fn bandwidth(&self) -> f32 { self.bandwidth }
    pub fn step(&self) -> f32 { self.step }

    pub fn index_of(&self, value: &Datum) -> Option<usize> {
        let key = value.key();
        self.keys.iter().position(|k| *k == key)
    }

    /// Left edge of the band of `value`.
    pub fn to_px(&self, value: &Datum) -> Option<f32> {
        self.index_of(value).map(|i| self.start + self.step * i as f32)
    }

    /// Index of the band whose left edge is closest to `px`.
    pub fn index_at(&self, px: f32) -> Option<usize> {
        if self.domain.is_empty() {
            return None;
        }
        let raw = ((px - self.start) / self.step.max(1e-6)).round();
        Some(raw.clamp(0.0, (self.domain.len() - 1) as f32) as usize)
    }
}

/// Horizontal scale of a cartesian chart.
#[derive(Clone, Debug, PartialEq)]
pub enum XScale {
    Continuous(ContinuousScale),
    Band(BandScale),
}

impl XScale {
    pub fn position(&self, value: &Datum) -> Option<f32> {
        match self {
            XScale::Continuous(s) => value.as_f64().map(|v| s.to_px(v)),
            XScale::Band(b) => b.to_px(value),
        }
    }

    /// Pixel of the value itself, or of the band's middle.
    pub fn center(&self, value: &Datum) -> Option<f32> {
        let half = self.bandwidth() / 2.0;
        self.position(value).map(|px| px + half)
    }

    pub fn bandwidth(&self) -> f32 {
        match self {
            XScale::Continuous(_) => 0.0,
            XScale::Band(b) => b.bandwidth(),
        }
    }

    /// Tick positions with their labels.
    pub fn ticks(&self, count: usize, format: &TickFormat) -> Vec<(f32, String)> {
        match self {
            XScale::Continuous(s) => s.ticks(count).into_iter().map(|t| (s.to_px(t), format.format_f64(t))).collect(),
            XScale::Band(b) => {
                let half = b.bandwidth() / 2.0;
                b.domain()
                    .iter()
                    .filter_map(|d| b.to_px(d).map(|px| (px + half, format.format(d))))
                    .collect()
            }
        }
    }
}

/// Min/max of `values`. Log scales ignore non-positive values; `enforce_zero` pulls the minimum to 0.
pub fn extent(values: impl IntoIterator<Item = f64>, kind: ScaleKind, enforce_zero: bool) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() || (kind == ScaleKind::Log && v <= 0.0) {
            continue;
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if enforce_zero && kind != ScaleKind::Log {
        lo = lo.min(0.0);
    }
    Some((lo, hi))
}
