//! In-place tessellation of generated outlines.
//!
//! Input points sit at the stride the generator was given (3 for [`triangleize`],
//! 6 for [`outlineize`]); the output occupies exactly the slots in between.

use crate::coords::Vec2;
use crate::render::Vertex;

use super::generate::get;

/// Vertices per fan triangle.
pub const FILL_STRIDE: usize = 3;
/// Vertices per stroked edge (two triangles).
pub const STROKE_STRIDE: usize = 6;

/// Number of edges an `n`-point outline produces.
#[inline]
pub fn edge_count(n: usize, connected: bool) -> usize {
    if connected { n } else { n.saturating_sub(1) }
}

/// Builds a triangle fan anchored at `center`.
///
/// Triangle `i` is `{p_i, p_(i+1), center}`; the closing edge back to `p_0` is only
/// emitted when `connected`.
pub fn triangleize(out: &mut [Vertex], n: usize, center: Vec2, color: [f32; 4], connected: bool) {
    for i in 0..edge_count(n, connected) {
        let base = i * FILL_STRIDE;
        let start = get(out, base);
        let end = get(out, ((i + 1) % n) * FILL_STRIDE);

        out[base] = Vertex::solid(start.x, start.y, color);
        out[base + 1] = Vertex::solid(end.x, end.y, color);
        out[base + 2] = Vertex::solid(center.x, center.y, color);
    }
}

/// Two triangles covering the segment `p1 → p2` widened to `thickness`.
///
/// Coincident endpoints divide by zero; callers must not pass them.
pub fn edge_quad(p1: Vec2, p2: Vec2, thickness: f32, color: [f32; 4]) -> [Vertex; 6] {
    let d = p2 - p1;
    // Right-hand normal of the direction of travel, scaled to half the thickness.
    let adj = Vec2::new(d.y, -d.x) * (thickness * 0.5 / d.length());

    let a = p1 + adj;
    let b = p2 + adj;
    let c = p1 - adj;
    let e = p2 - adj;
    [
        Vertex::solid(a.x, a.y, color),
        Vertex::solid(b.x, b.y, color),
        Vertex::solid(c.x, c.y, color),
        Vertex::solid(c.x, c.y, color),
        Vertex::solid(b.x, b.y, color),
        Vertex::solid(e.x, e.y, color),
    ]
}

/// Strokes every edge of the outline with a quad of width `thickness`.
pub fn outlineize(out: &mut [Vertex], n: usize, thickness: f32, color: [f32; 4], connected: bool) {
    let Some(first) = (n > 0).then(|| get(out, 0)) else { return };

    for i in 0..edge_count(n, connected) {
        let base = i * STROKE_STRIDE;
        let p1 = get(out, base);
        // The first point has already been overwritten by the time the closing edge runs.
        let p2 = if i == n - 1 { first } else { get(out, base + STROKE_STRIDE) };

        out[base..base + STROKE_STRIDE].copy_from_slice(&edge_quad(p1, p2, thickness, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NO_TEXTURE;
    use crate::shapes::generate::{put, rectangle};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn pos(v: &Vertex) -> Vec2 {
        Vec2::new(v.position[0], v.position[1])
    }

    // ── triangleize ───────────────────────────────────────────────────────

    #[test]
    fn fan_over_rectangle() {
        let mut buf = vec![Vertex::default(); 12];
        let n = rectangle(&mut buf, FILL_STRIDE, 0.0, 0.0, 2.0, 2.0);
        triangleize(&mut buf, n, Vec2::new(1.0, 1.0), RED, true);

        for tri in buf.chunks(3) {
            assert_eq!(pos(&tri[2]), Vec2::new(1.0, 1.0));
            for v in tri {
                assert_eq!(v.color, RED);
                assert_eq!(v.texture, NO_TEXTURE);
            }
        }
        // Closing triangle runs from the last corner back to the first.
        assert_eq!(pos(&buf[9]), Vec2::new(2.0, 0.0));
        assert_eq!(pos(&buf[10]), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn open_fan_skips_closing_edge() {
        let mut buf = vec![Vertex::default(); 3 * 3 + 1];
        for (i, p) in [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)]
            .into_iter()
            .enumerate()
        {
            put(&mut buf, FILL_STRIDE, i, p);
        }
        triangleize(&mut buf, 3, Vec2::zero(), RED, false);
        assert_eq!(pos(&buf[3]), Vec2::new(0.0, 1.0));
        assert_eq!(pos(&buf[4]), Vec2::new(-1.0, 0.0));
        // Third triangle slot untouched apart from the generator's point.
        assert_eq!(buf[6].color, [0.0; 4]);
    }

    // ── outlineize ────────────────────────────────────────────────────────

    #[test]
    fn stroked_segment_has_expected_edges() {
        let p1 = Vec2::new(1.0, 1.0);
        let p2 = Vec2::new(4.0, 5.0);
        let t = 0.5;
        let mut buf = vec![Vertex::default(); 2 * STROKE_STRIDE];
        put(&mut buf, STROKE_STRIDE, 0, p1);
        put(&mut buf, STROKE_STRIDE, 1, p2);
        outlineize(&mut buf, 2, t, RED, false);

        let q: Vec<Vec2> = buf[..6].iter().map(pos).collect();
        let len = (p2 - p1).length();
        // Long edges: a→b (vertices 0,1) and c→e (vertices 2,5).
        assert!(((q[1] - q[0]).length() - len).abs() < 1e-5);
        assert!(((q[5] - q[2]).length() - len).abs() < 1e-5);
        // Separation between the long edges equals the thickness.
        assert!(((q[0] - q[2]).length() - t).abs() < 1e-5);
        assert!(((q[1] - q[5]).length() - t).abs() < 1e-5);
        // Offset is perpendicular to the segment.
        assert!((q[0] - q[2]).dot(p2 - p1).abs() < 1e-5);
    }

    #[test]
    fn closed_outline_wraps_to_first_point() {
        let mut buf = vec![Vertex::default(); 4 * STROKE_STRIDE];
        let n = rectangle(&mut buf, STROKE_STRIDE, 0.0, 0.0, 1.0, 1.0);
        outlineize(&mut buf, n, 0.1, RED, true);
        // Last quad runs from (1,0) back to (0,0): horizontal, offset vertically.
        let last = &buf[18..24];
        assert!((pos(&last[0]).y - pos(&last[2]).y).abs() > 0.09);
        assert!((pos(&last[1]).x - 0.0).abs() < 1e-6);
    }
}
