// File: crates/grapher-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math (rects, points, arcs).

pub type Point = (f32, f32);

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
    pub fn contains(&self, (x, y): Point) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Annular sector. Angles are radians, clockwise from 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcShape {
    pub cx: f32,
    pub cy: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub pad_angle: f32,
    pub corner_radius: f32,
}

impl ArcShape {
    /// Screen point at `radius` and `angle`.
    pub fn point_at(&self, radius: f32, angle: f32) -> Point {
        (self.cx + radius * angle.sin(), self.cy - radius * angle.cos())
    }

    /// Start/end angles after removing half the pad angle on each side.
    pub fn padded_angles(&self) -> (f32, f32) {
        let span = self.end_angle - self.start_angle;
        let pad = (self.pad_angle / 2.0).min(span.abs() / 2.0) * span.signum();
        (self.start_angle + pad, self.end_angle - pad)
    }

    /// Polygon approximation: outer edge forward, inner edge backward.
    pub fn outline(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(2);
        let (a0, a1) = self.padded_angles();
        let step = (a1 - a0) / segments as f32;
        let mut pts: Vec<Point> = (0..=segments)
            .map(|i| self.point_at(self.outer_radius, a0 + step * i as f32))
            .collect();
        if self.inner_radius > 0.0 {
            pts.extend((0..=segments).rev().map(|i| self.point_at(self.inner_radius, a0 + step * i as f32)));
        } else {
            pts.push((self.cx, self.cy));
        }
        pts
    }
}
