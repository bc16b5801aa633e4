use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::Texture;

/// Two triangles over the four quad corners, relative to the quad's first vertex.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex as uploaded to the GPU.
///
/// `slot` is the index of the texture slot the quad samples from. Emitters
/// leave it at zero; it is rewritten when the quad is placed into a batch.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub slot: f32,
}

impl Vertex {
    #[inline]
    pub fn new(pos: Vec2, uv: [f32; 2], color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            uv,
            color: color.clamped().to_array(),
            slot: 0.0,
        }
    }
}

/// One queued quad: four vertices, six local indices and the texture it samples.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawQuad {
    pub vertices: [Vertex; 4],
    /// Indices into `vertices` (`0..4`). Rebased onto the batch at flush time.
    pub indices: [u32; 6],
    pub texture: Texture,
}

impl DrawQuad {
    #[inline]
    pub fn new(vertices: [Vertex; 4], texture: Texture) -> Self {
        Self {
            vertices,
            indices: QUAD_INDICES,
            texture,
        }
    }
}
