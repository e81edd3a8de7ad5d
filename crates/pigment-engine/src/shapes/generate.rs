//! Outline generators.
//!
//! Each generator writes points into `out` at a vertex stride chosen by the caller
//! (3 for fills, 6 for outlines) and returns the number of points written. Only
//! `position` is touched; the tessellators fill the remaining attributes in place.

use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::render::Vertex;

#[inline]
pub(crate) fn put(out: &mut [Vertex], stride: usize, i: usize, p: Vec2) {
    out[i * stride].position = [p.x, p.y, 0.0];
}

#[inline]
pub(crate) fn get(out: &[Vertex], index: usize) -> Vec2 {
    let [x, y, _] = out[index].position;
    Vec2::new(x, y)
}

#[inline]
fn signum(v: f32) -> f32 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Axis-aligned rectangle: `(x,y) (x,y+h) (x+w,y+h) (x+w,y)`.
pub fn rectangle(out: &mut [Vertex], stride: usize, x: f32, y: f32, w: f32, h: f32) -> usize {
    put(out, stride, 0, Vec2::new(x, y));
    put(out, stride, 1, Vec2::new(x, y + h));
    put(out, stride, 2, Vec2::new(x + w, y + h));
    put(out, stride, 3, Vec2::new(x + w, y));
    4
}

pub fn quad(out: &mut [Vertex], stride: usize, corners: &[Vec2; 4]) -> usize {
    for (i, &c) in corners.iter().enumerate() {
        put(out, stride, i, c);
    }
    4
}

/// Closed circle: `segments` points, no duplicated closing point.
pub fn circle(out: &mut [Vertex], stride: usize, center: Vec2, r: f32, segments: usize) -> usize {
    for i in 0..segments {
        let angle = TAU * i as f32 / segments as f32;
        put(out, stride, i, center + Vec2::new(angle.cos(), angle.sin()) * r);
    }
    segments
}

/// Open arc from `start` to `stop` (radians, counter-clockwise positive).
///
/// Writes `segments + 1` points; both endpoints are explicit.
pub fn circle_arc(
    out: &mut [Vertex],
    stride: usize,
    center: Vec2,
    r: f32,
    start: f32,
    stop: f32,
    segments: usize,
) -> usize {
    let sweep = stop - start;
    for i in 0..=segments {
        let angle = start + sweep * i as f32 / segments as f32;
        put(out, stride, i, center + Vec2::new(angle.cos(), angle.sin()) * r);
    }
    segments + 1
}

/// Boundary of `|x/a|^n + |y/b|^n = 1`.
///
/// `n = 2` is an ellipse, `n = 1` a diamond, large `n` approaches a rectangle.
pub fn superellipse(
    out: &mut [Vertex],
    stride: usize,
    center: Vec2,
    a: f32,
    b: f32,
    exponent: f32,
    segments: usize,
) -> usize {
    let power = 2.0 / exponent;
    for i in 0..segments {
        let angle = TAU * i as f32 / segments as f32;
        let (s, c) = angle.sin_cos();
        let x = a * signum(c) * c.abs().powf(power);
        let y = b * signum(s) * s.abs().powf(power);
        put(out, stride, i, center + Vec2::new(x, y));
    }
    segments
}

/// Shoelace formula. Positive for counter-clockwise input in a +Y-up space.
pub fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    let mut sum = 0.0f64;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        sum += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    0.5 * sum
}

#[cfg(test)]
pub(crate) fn read_points(out: &[Vertex], stride: usize, n: usize) -> Vec<Vec2> {
    (0..n).map(|i| get(out, i * stride)).collect()
}
