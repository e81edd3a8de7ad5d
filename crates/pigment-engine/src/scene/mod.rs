//! Scene: one flat vertex buffer per frame plus the atlases its vertices sample.
//!
//! Every `add_*` call reserves room at the cursor, lets a generator write the outline
//! straight into that tail, tessellates it in place and advances the cursor. The
//! buffer never reallocates; running past `max_vertices` is a programmer error and
//! panics.
//!
//! Coordinates:
//! - scene space spans `x ∈ [-1, 1]`, `y ∈ [-y_scale, y_scale]`, +Y up
//! - with `use_screen_coords` every input is in pixels (top-left origin, +Y down) and
//!   is mapped into scene space with one uniform scale, so circles stay round

mod config;
mod geometry;
mod image;
mod text;

pub use config::{SceneConfig, SceneShaders};
pub use text::FontId;

use crate::bitmap::ImageAtlas;
use crate::coords::{Vec2, Viewport};
use crate::render::Vertex;
use crate::text::FontAtlas;
use crate::texture::{SlotId, SlotTable};

struct LoadedFont {
    atlas: FontAtlas,
    slot: SlotId,
}

pub struct Scene {
    config: SceneConfig,
    /// `max_vertices + 1`: open outlines write one trailing point past their output.
    vertices: Vec<Vertex>,
    cursor: usize,
    viewport: Viewport,
    y_scale: f32,
    slots: SlotTable,
    fonts: Vec<LoadedFont>,
    images: ImageAtlas,
}

impl Scene {
    /// Allocates the vertex buffer once.
    ///
    /// # Panics
    /// If `config.vertex_size` is not [`Vertex::FLOATS`].
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        if config.vertex_size != Vertex::FLOATS {
            panic!(
                "invalid vertex size {}: scene vertices are exactly {} floats \
                 (position 3, color 4, uv 2, texture 1)",
                config.vertex_size,
                Vertex::FLOATS
            );
        }
        if !viewport.is_valid() {
            log::warn!("scene created with degenerate viewport {viewport:?}");
        }

        log::debug!(
            "scene created: {} vertices, screen coords {}",
            config.max_vertices,
            config.use_screen_coords
        );
        Self {
            vertices: vec![Vertex::default(); config.max_vertices + 1],
            cursor: 0,
            viewport,
            y_scale: viewport.y_scale(),
            slots: SlotTable::new(),
            fonts: Vec::new(),
            images: ImageAtlas::new(),
            config,
        }
    }

    /// Starts a new frame: rewinds the cursor and re-derives `y_scale`.
    ///
    /// Buffer contents are left in place; only the logical length is reset.
    pub fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.y_scale = viewport.y_scale();
        self.cursor = 0;
    }

    /// Vertices accumulated since the last [`Scene::reset`].
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.cursor]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.max_vertices
    }

    #[inline]
    pub fn y_scale(&self) -> f32 {
        self.y_scale
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    // ── buffer ────────────────────────────────────────────────────────────

    /// The tail a shape emitting `count` vertices may write into, plus one scratch vertex.
    ///
    /// # Panics
    /// Exactly when `len() + count > capacity()`.
    fn reserve(&mut self, count: usize) -> &mut [Vertex] {
        let end = self.cursor + count;
        if end > self.capacity() {
            panic!(
                "scene vertex buffer overflow: {} + {count} vertices exceeds capacity {}",
                self.cursor,
                self.capacity()
            );
        }
        &mut self.vertices[self.cursor..=end]
    }

    #[inline]
    fn commit(&mut self, count: usize) {
        self.cursor += count;
    }

    // ── coordinate transform ──────────────────────────────────────────────

    /// Scene units per pixel.
    #[inline]
    fn px(&self) -> f32 {
        2.0 / self.viewport.width
    }

    /// Maps an input position into scene space.
    #[inline]
    fn point(&self, p: Vec2) -> Vec2 {
        if self.config.use_screen_coords {
            Vec2::new(p.x * self.px() - 1.0, -p.y * self.px() + self.y_scale)
        } else {
            p
        }
    }

    /// Maps an input length (radius, thickness, width) into scene space.
    #[inline]
    fn length(&self, l: f32) -> f32 {
        if self.config.use_screen_coords { l * self.px() } else { l }
    }

    /// Expresses a pixel distance (glyph advance, image size) in input units.
    #[inline]
    fn input_units(&self, px: f32) -> f32 {
        if self.config.use_screen_coords { px } else { px * self.px() }
    }

    /// Maps an input size; heights flip sign with the +Y-down input axis.
    #[inline]
    fn size(&self, s: Vec2) -> Vec2 {
        if self.config.use_screen_coords {
            Vec2::new(s.x * self.px(), -s.y * self.px())
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    pub(super) fn screen_scene(capacity: usize) -> Scene {
        let config = SceneConfig { max_vertices: capacity, ..SceneConfig::default() };
        Scene::new(config, Viewport::new(100.0, 100.0))
    }

    fn rect(scene: &mut Scene) {
        scene.add_rectangle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Color::white());
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn rectangle_adds_twelve_vertices() {
        let mut scene = screen_scene(100);
        rect(&mut scene);
        assert_eq!(scene.len(), 12);
        assert_eq!(scene.vertices().len(), 12);
    }

    #[test]
    fn filling_to_exact_capacity_succeeds() {
        let mut scene = screen_scene(24);
        rect(&mut scene);
        rect(&mut scene);
        assert_eq!(scene.len(), scene.capacity());
    }

    #[test]
    #[should_panic(expected = "scene vertex buffer overflow: 24 + 12 vertices exceeds capacity 24")]
    fn one_more_shape_past_capacity_is_fatal() {
        let mut scene = screen_scene(24);
        for _ in 0..3 {
            rect(&mut scene);
        }
    }

    #[test]
    #[should_panic(expected = "scene vertex buffer overflow: 96 + 12")]
    fn overflow_fires_on_the_shape_that_crosses() {
        let mut scene = screen_scene(100);
        for _ in 0..8 {
            rect(&mut scene);
        }
        assert_eq!(scene.len(), 96);
        rect(&mut scene);
    }

    #[test]
    #[should_panic(expected = "invalid vertex size 12")]
    fn wrong_vertex_size_is_fatal() {
        let config = SceneConfig { vertex_size: 12, ..SceneConfig::default() };
        Scene::new(config, Viewport::new(10.0, 10.0));
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    #[test]
    fn reset_rewinds_and_rescales() {
        let mut scene = screen_scene(100);
        rect(&mut scene);
        scene.reset(Viewport::new(200.0, 50.0));
        assert!(scene.is_empty());
        assert_eq!(scene.y_scale(), 0.25);
        rect(&mut scene);
        assert_eq!(scene.len(), 12);
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn screen_corners_map_to_scene_extents() {
        let scene = Scene::new(SceneConfig::default(), Viewport::new(200.0, 100.0));
        assert_eq!(scene.point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 0.5));
        assert_eq!(scene.point(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -0.5));
        assert_eq!(scene.size(Vec2::new(100.0, 50.0)), Vec2::new(1.0, -0.5));
        assert_eq!(scene.length(50.0), 0.5);
    }

    #[test]
    fn normalized_mode_passes_through() {
        let config = SceneConfig { use_screen_coords: false, ..SceneConfig::default() };
        let scene = Scene::new(config, Viewport::new(200.0, 100.0));
        assert_eq!(scene.point(Vec2::new(0.3, -0.2)), Vec2::new(0.3, -0.2));
        assert_eq!(scene.size(Vec2::new(0.5, 0.5)), Vec2::new(0.5, 0.5));
        assert_eq!(scene.length(0.1), 0.1);
    }
}
