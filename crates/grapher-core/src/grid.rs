// File: crates/grapher-core/src/grid.rs
// Summary: Tick layout helpers (d3-style nice steps and tick counts).

/// Step between ticks so roughly `count` ticks cover `[start, stop]` (1, 2 or 5 × 10^k).
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 || !span.is_finite() { return 0.0; }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Ticks at multiples of the nice step inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    let step = tick_increment(lo, hi, count);
    if step == 0.0 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Extend `[start, stop]` outward to multiples of the nice step.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let (mut lo, mut hi) = (start, stop);
    // two passes: the step can change once the bounds move
    for _ in 0..2 {
        let step = tick_increment(lo, hi, count);
        if step == 0.0 { break; }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
    }
    (lo, hi)
}
