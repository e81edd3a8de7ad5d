use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::Vertex;
use crate::shapes::{
    circle, circle_arc, edge_count, edge_quad, outlineize, quad, rectangle, rounded_quad,
    rounded_quad_point_count, superellipse, triangleize, RoundedCorners, FILL_STRIDE, STROKE_STRIDE,
};

use super::Scene;

impl Scene {
    /// Generates `points` outline points at fill stride and fans them around `center`.
    fn fill<G>(&mut self, points: usize, center: Vec2, color: Color, connected: bool, generate: G)
    where
        G: FnOnce(&mut [Vertex], usize) -> usize,
    {
        let count = edge_count(points, connected) * FILL_STRIDE;
        let out = self.reserve(count);
        let n = generate(out, FILL_STRIDE);
        debug_assert_eq!(n, points);
        triangleize(out, n, center, color.to_array(), connected);
        self.commit(count);
    }

    /// Generates `points` outline points at stroke stride and strokes every edge.
    fn stroke<G>(&mut self, points: usize, thickness: f32, color: Color, connected: bool, generate: G)
    where
        G: FnOnce(&mut [Vertex], usize) -> usize,
    {
        let count = edge_count(points, connected) * STROKE_STRIDE;
        let out = self.reserve(count);
        let n = generate(out, STROKE_STRIDE);
        debug_assert_eq!(n, points);
        outlineize(out, n, thickness, color.to_array(), connected);
        self.commit(count);
    }

    fn corners(&self, corners: [Vec2; 4]) -> [Vec2; 4] {
        corners.map(|c| self.point(c))
    }

    // ── rectangles and quads ──────────────────────────────────────────────

    pub fn add_rectangle(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let (o, s) = (self.point(origin), self.size(size));
        let center = o + s * 0.5;
        self.fill(4, center, color, true, |out, stride| rectangle(out, stride, o.x, o.y, s.x, s.y));
    }

    pub fn add_rectangle_outline(&mut self, origin: Vec2, size: Vec2, thickness: f32, color: Color) {
        let (o, s, t) = (self.point(origin), self.size(size), self.length(thickness));
        self.stroke(4, t, color, true, |out, stride| rectangle(out, stride, o.x, o.y, s.x, s.y));
    }

    /// Fills a convex quad, fanned from its centroid.
    pub fn add_quad(&mut self, corners: [Vec2; 4], color: Color) {
        let corners = self.corners(corners);
        let center = Vec2::centroid(&corners);
        self.fill(4, center, color, true, |out, stride| quad(out, stride, &corners));
    }

    pub fn add_quad_outline(&mut self, corners: [Vec2; 4], thickness: f32, color: Color) {
        let (corners, t) = (self.corners(corners), self.length(thickness));
        self.stroke(4, t, color, true, |out, stride| quad(out, stride, &corners));
    }

    // ── circles ───────────────────────────────────────────────────────────

    pub fn add_circle(&mut self, center: Vec2, radius: f32, segments: usize, color: Color) {
        let (c, r) = (self.point(center), self.length(radius));
        self.fill(segments, c, color, true, |out, stride| circle(out, stride, c, r, segments));
    }

    pub fn add_circle_outline(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: usize,
        thickness: f32,
        color: Color,
    ) {
        let (c, r, t) = (self.point(center), self.length(radius), self.length(thickness));
        self.stroke(segments, t, color, true, |out, stride| circle(out, stride, c, r, segments));
    }

    /// Filled pie slice between two angles.
    ///
    /// Angles are radians, counter-clockwise positive, in both coordinate modes.
    pub fn add_circle_slice(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        stop: f32,
        segments: usize,
        color: Color,
    ) {
        let (c, r) = (self.point(center), self.length(radius));
        self.fill(segments + 1, c, color, false, |out, stride| {
            circle_arc(out, stride, c, r, start, stop, segments)
        });
    }

    /// Stroked open arc between two angles.
    #[allow(clippy::too_many_arguments)]
    pub fn add_circle_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        stop: f32,
        segments: usize,
        thickness: f32,
        color: Color,
    ) {
        let (c, r, t) = (self.point(center), self.length(radius), self.length(thickness));
        self.stroke(segments + 1, t, color, false, |out, stride| {
            circle_arc(out, stride, c, r, start, stop, segments)
        });
    }

    // ── superellipses ─────────────────────────────────────────────────────

    pub fn add_superellipse(
        &mut self,
        center: Vec2,
        a: f32,
        b: f32,
        exponent: f32,
        segments: usize,
        color: Color,
    ) {
        let (c, a, b) = (self.point(center), self.length(a), self.length(b));
        self.fill(segments, c, color, true, |out, stride| {
            superellipse(out, stride, c, a, b, exponent, segments)
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_superellipse_outline(
        &mut self,
        center: Vec2,
        a: f32,
        b: f32,
        exponent: f32,
        segments: usize,
        thickness: f32,
        color: Color,
    ) {
        let (c, a, b) = (self.point(center), self.length(a), self.length(b));
        let t = self.length(thickness);
        self.stroke(segments, t, color, true, |out, stride| {
            superellipse(out, stride, c, a, b, exponent, segments)
        });
    }

    // ── rounded quads ─────────────────────────────────────────────────────

    /// Fills a convex quad whose selected corners are replaced by tangent fillets.
    pub fn add_rounded_quad(
        &mut self,
        corners: [Vec2; 4],
        rounded: RoundedCorners,
        radius: f32,
        segments_per_corner: usize,
        color: Color,
    ) {
        let (corners, r) = (self.corners(corners), self.length(radius));
        let center = Vec2::centroid(&corners);
        let points = rounded_quad_point_count(rounded, segments_per_corner);
        self.fill(points, center, color, true, |out, stride| {
            rounded_quad(out, stride, &corners, rounded, r, segments_per_corner)
        });
    }

    pub fn add_rounded_quad_outline(
        &mut self,
        corners: [Vec2; 4],
        rounded: RoundedCorners,
        radius: f32,
        segments_per_corner: usize,
        thickness: f32,
        color: Color,
    ) {
        let (corners, r, t) = (self.corners(corners), self.length(radius), self.length(thickness));
        let points = rounded_quad_point_count(rounded, segments_per_corner);
        self.stroke(points, t, color, true, |out, stride| {
            rounded_quad(out, stride, &corners, rounded, r, segments_per_corner)
        });
    }

    /// Axis-aligned rectangle with every corner rounded.
    pub fn add_rounded_rectangle(
        &mut self,
        origin: Vec2,
        size: Vec2,
        radius: f32,
        segments_per_corner: usize,
        color: Color,
    ) {
        let (o, s, r) = (self.point(origin), self.size(size), self.length(radius));
        let corners = rect_corners(o, s);
        let center = o + s * 0.5;
        let points = rounded_quad_point_count(None, segments_per_corner);
        self.fill(points, center, color, true, |out, stride| {
            rounded_quad(out, stride, &corners, None, r, segments_per_corner)
        });
    }

    pub fn add_rounded_rectangle_outline(
        &mut self,
        origin: Vec2,
        size: Vec2,
        radius: f32,
        segments_per_corner: usize,
        thickness: f32,
        color: Color,
    ) {
        let (o, s, r) = (self.point(origin), self.size(size), self.length(radius));
        let corners = rect_corners(o, s);
        let t = self.length(thickness);
        let points = rounded_quad_point_count(None, segments_per_corner);
        self.stroke(points, t, color, true, |out, stride| {
            rounded_quad(out, stride, &corners, None, r, segments_per_corner)
        });
    }

    // ── lines ─────────────────────────────────────────────────────────────

    /// Single segment of width `thickness`; `from` and `to` must differ.
    pub fn add_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let (a, b, t) = (self.point(from), self.point(to), self.length(thickness));
        let out = self.reserve(STROKE_STRIDE);
        out[..STROKE_STRIDE].copy_from_slice(&edge_quad(a, b, t, color.to_array()));
        self.commit(STROKE_STRIDE);
    }
}

fn rect_corners(o: Vec2, s: Vec2) -> [Vec2; 4] {
    [o, Vec2::new(o.x, o.y + s.y), o + s, Vec2::new(o.x + s.x, o.y)]
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::coords::Viewport;
    use crate::render::NO_TEXTURE;
    use crate::scene::tests::screen_scene;
    use crate::scene::SceneConfig;

    fn pos(v: &Vertex) -> Vec2 {
        Vec2::new(v.position[0], v.position[1])
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    type Case = (usize, Box<dyn Fn(&mut Scene)>);

    fn case(expected: usize, add: impl Fn(&mut Scene) + 'static) -> Case {
        (expected, Box::new(add))
    }

    fn normalized_scene(capacity: usize) -> Scene {
        let config = SceneConfig {
            max_vertices: capacity,
            use_screen_coords: false,
            ..SceneConfig::default()
        };
        Scene::new(config, Viewport::new(200.0, 100.0))
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn every_shape_emits_its_exact_vertex_count() {
        let c = Color::white();
        let p = Vec2::new(50.0, 50.0);
        let s = Vec2::new(20.0, 10.0);
        let quad = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0)];

        let cases = [
            case(12, move |sc| sc.add_rectangle(p, s, c)),
            case(24, move |sc| sc.add_rectangle_outline(p, s, 1.0, c)),
            case(12, move |sc| sc.add_quad(quad, c)),
            case(24, move |sc| sc.add_quad_outline(quad, 1.0, c)),
            case(48, move |sc| sc.add_circle(p, 5.0, 16, c)),
            case(96, move |sc| sc.add_circle_outline(p, 5.0, 16, 1.0, c)),
            case(24, move |sc| sc.add_circle_slice(p, 5.0, 0.0, PI, 8, c)),
            case(48, move |sc| sc.add_circle_arc(p, 5.0, 0.0, PI, 8, 1.0, c)),
            case(60, move |sc| sc.add_superellipse(p, 8.0, 5.0, 4.0, 20, c)),
            case(120, move |sc| sc.add_superellipse_outline(p, 8.0, 5.0, 4.0, 20, 1.0, c)),
            case(60, move |sc| sc.add_rounded_rectangle(p, s, 3.0, 4, c)),
            case(120, move |sc| sc.add_rounded_rectangle_outline(p, s, 3.0, 4, 1.0, c)),
            case(3 * 8, move |sc| sc.add_rounded_quad(quad, Some([true, false, true, false]), 2.0, 2, c)),
            case(6 * 8, move |sc| sc.add_rounded_quad_outline(quad, Some([false, true, false, true]), 2.0, 2, 1.0, c)),
            case(6, move |sc| sc.add_line(p, p + s, 2.0, c)),
        ];

        for (i, (expected, add)) in cases.iter().enumerate() {
            let mut scene = screen_scene(1000);
            add(&mut scene);
            assert_eq!(scene.len(), *expected, "case {i}");
            assert!(scene.vertices().iter().all(|v| v.texture == NO_TEXTURE && v.color == c.to_array()));
        }
    }

    #[test]
    fn open_arc_fits_exact_capacity() {
        // The final arc point lands on the scratch vertex past the output.
        let mut scene = screen_scene(48);
        scene.add_circle_arc(Vec2::new(50.0, 50.0), 10.0, 0.0, PI, 8, 2.0, Color::black());
        assert_eq!(scene.len(), 48);

        let mut scene = screen_scene(24);
        scene.add_circle_slice(Vec2::new(50.0, 50.0), 10.0, 0.0, PI, 8, Color::black());
        assert_eq!(scene.len(), 24);
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn screen_rectangle_lands_in_scene_space() {
        let mut scene = screen_scene(100);
        scene.add_rectangle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Color::white());
        let v = scene.vertices();

        assert!(close(pos(&v[0]), Vec2::new(-1.0, 1.0)));
        assert!(close(pos(&v[1]), Vec2::new(-1.0, 0.8)));
        assert!(close(pos(&v[2]), Vec2::new(-0.9, 0.9)));
        assert!(close(pos(&v[4]), Vec2::new(-0.8, 0.8)));
    }

    #[test]
    fn screen_circles_stay_round() {
        let mut scene = Scene::new(SceneConfig::default(), Viewport::new(200.0, 100.0));
        scene.add_circle(Vec2::new(150.0, 20.0), 10.0, 12, Color::white());

        let v = scene.vertices();
        let center = pos(&v[2]);
        assert!(close(center, Vec2::new(0.5, 0.3)));
        for tri in v.chunks(3) {
            assert!(((pos(&tri[0]) - center).length() - 0.1).abs() < 1e-5);
            assert!(((pos(&tri[1]) - center).length() - 0.1).abs() < 1e-5);
        }
    }

    #[test]
    fn line_is_a_quad_of_the_requested_thickness() {
        let mut scene = normalized_scene(6);
        scene.add_line(Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0), 0.2, Color::white());
        let v = scene.vertices();

        assert!(close(pos(&v[0]), Vec2::new(-0.5, -0.1)));
        assert!(close(pos(&v[1]), Vec2::new(0.5, -0.1)));
        assert!(close(pos(&v[2]), Vec2::new(-0.5, 0.1)));
        assert!(close(pos(&v[5]), Vec2::new(0.5, 0.1)));
    }

    #[test]
    fn rounded_rectangle_fillets_stay_inside_the_rectangle() {
        let mut scene = normalized_scene(1000);
        let (o, s) = (Vec2::new(-0.5, -0.25), Vec2::new(1.0, 0.5));
        scene.add_rounded_rectangle(o, s, 0.1, 6, Color::white());

        for v in scene.vertices() {
            let p = pos(v);
            assert!(p.x >= o.x - 1e-5 && p.x <= o.x + s.x + 1e-5);
            assert!(p.y >= o.y - 1e-5 && p.y <= o.y + s.y + 1e-5);
        }
        // Corners themselves are cut off.
        assert!(scene.vertices().iter().all(|v| !close(pos(v), o)));
    }
}
