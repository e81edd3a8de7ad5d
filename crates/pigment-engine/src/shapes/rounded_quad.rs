//! Quadrilateral with tangent-circle fillets on selected corners.
//!
//! Precondition: the quad is convex and simple. Concave or self-intersecting input
//! produces unspecified geometry; nothing here detects it.

use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::render::Vertex;

use super::generate::{put, signed_area};

/// Per-corner rounding flags; `None` rounds every corner.
pub type RoundedCorners = Option<[bool; 4]>;

/// Number of points [`rounded_quad`] will write for the same arguments.
pub fn rounded_quad_point_count(rounded: RoundedCorners, segments_per_corner: usize) -> usize {
    let per_rounded = segments_per_corner.max(1) + 1;
    rounded
        .unwrap_or([true; 4])
        .iter()
        .map(|&r| if r { per_rounded } else { 1 })
        .sum()
}

/// Writes the outline of a (partially) rounded quad, always counter-clockwise.
///
/// Clockwise input (negative signed area) is traversed in reverse. A rounded corner
/// emits `segments_per_corner + 1` points from the tangent point on the incoming edge
/// to the tangent point on the outgoing edge; an unrounded corner emits itself.
pub fn rounded_quad(
    out: &mut [Vertex],
    stride: usize,
    corners: &[Vec2; 4],
    rounded: RoundedCorners,
    radius: f32,
    segments_per_corner: usize,
) -> usize {
    let flags = rounded.unwrap_or([true; 4]);
    let segments = segments_per_corner.max(1);
    let order: [usize; 4] = if signed_area(corners) < 0.0 { [3, 2, 1, 0] } else { [0, 1, 2, 3] };

    let mut n = 0;
    for k in 0..4 {
        let i = order[k];
        let cur = corners[i];

        if !flags[i] {
            put(out, stride, n, cur);
            n += 1;
            continue;
        }

        let prev = corners[order[(k + 3) % 4]];
        let next = corners[order[(k + 1) % 4]];
        let to_prev = (prev - cur).normalized();
        let to_next = (next - cur).normalized();
        let bisector = ((to_prev + to_next) * 0.5).normalized();

        // The fillet radius meets both edges at right angles:
        //   radius = center_dist * sin(theta / 2)
        let half_theta = to_prev.dot(to_next).clamp(-1.0, 1.0).acos() * 0.5;
        let center_dist = radius / half_theta.sin();
        let center = cur + bisector * center_dist;

        let tangent_dist = center_dist * half_theta.cos();
        let first = cur + to_prev * tangent_dist;
        let last = cur + to_next * tangent_dist;

        let phi_first = (first.y - center.y).atan2(first.x - center.x);
        let mut phi_last = (last.y - center.y).atan2(last.x - center.x);
        if phi_last < phi_first {
            phi_last += TAU;
        }

        put(out, stride, n, first);
        n += 1;
        for s in 1..segments {
            let phi = phi_first + (phi_last - phi_first) * (s as f32 / segments as f32);
            put(out, stride, n, center + Vec2::new(phi.cos(), phi.sin()) * radius);
            n += 1;
        }
        put(out, stride, n, last);
        n += 1;
    }
    n
}
