use bytemuck::{Pod, Zeroable};

/// Texture index carried by untextured (solid-color) vertices.
pub const NO_TEXTURE: f32 = -1.0;

/// One scene vertex, uploaded byte-for-byte into the vertex buffer.
///
/// Layout (40 bytes, 10 floats):
///
///  offset  0  position  [f32; 3]  loc 0
///  offset 12  color     [f32; 4]  loc 1   premultiplied
///  offset 28  uv        [f32; 2]  loc 2
///  offset 36  texture   f32       loc 3   slot index, or -1
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub texture: f32,
}

const _: () = assert!(std::mem::size_of::<Vertex>() == Vertex::FLOATS * 4);

impl Vertex {
    /// Number of `f32`s per vertex; the only stride the scene accepts.
    pub const FLOATS: usize = 10;

    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2, // uv
        3 => Float32    // texture
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Untextured vertex at `(x, y)` on the z = 0 plane.
    #[inline]
    pub fn solid(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self { position: [x, y, 0.0], color, uv: [0.0, 0.0], texture: NO_TEXTURE }
    }

    /// Textured vertex sampling slot `texture` at `uv`.
    #[inline]
    pub fn textured(x: f32, y: f32, color: [f32; 4], uv: [f32; 2], texture: u32) -> Self {
        Self { position: [x, y, 0.0], color, uv, texture: texture as f32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn layout_matches_shader_attributes() {
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, uv), 28);
        assert_eq!(offset_of!(Vertex, texture), 36);
        assert_eq!(std::mem::size_of::<Vertex>(), 40);

        for (attr, offset) in Vertex::ATTRS.iter().zip([0u64, 12, 28, 36]) {
            assert_eq!(attr.offset, offset);
        }
    }

    #[test]
    fn casts_to_flat_floats() {
        let v = [Vertex::textured(1.0, 2.0, [0.1, 0.2, 0.3, 0.4], [0.5, 0.6], 3)];
        let floats: &[f32] = bytemuck::cast_slice(&v);
        assert_eq!(floats, &[1.0, 2.0, 0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 3.0]);
    }
}
