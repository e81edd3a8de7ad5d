use std::borrow::Cow;

use crate::render::Vertex;

/// WGSL sources for the scene pipeline.
///
/// Both stages must agree with [`Vertex`]'s attribute locations and the bind group
/// the renderer creates (uniform, sampler, eight 2-D textures).
#[derive(Debug, Clone)]
pub struct SceneShaders {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl Default for SceneShaders {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(include_str!("../render/shaders/scene_vs.wgsl")),
            fragment: Cow::Borrowed(include_str!("../render/shaders/scene_fs.wgsl")),
        }
    }
}

/// Scene creation parameters.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Floats per vertex. Must equal [`Vertex::FLOATS`].
    pub vertex_size: usize,
    /// Vertex buffer capacity; exceeding it is fatal.
    pub max_vertices: usize,
    /// Inputs are pixels (top-left origin, +Y down) rather than scene units.
    pub use_screen_coords: bool,
    /// Largest texture side the device accepts. Bounds every atlas.
    pub max_texture_size: u32,
    pub shaders: SceneShaders,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            vertex_size: Vertex::FLOATS,
            max_vertices: 1 << 16,
            use_screen_coords: true,
            max_texture_size: 8192,
            shaders: SceneShaders::default(),
        }
    }
}
