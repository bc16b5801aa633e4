use crate::scene::{DrawQuad, Vertex};

/// Flattened vertex/index data for one GPU submission.
///
/// Invariant: every index refers to a vertex of this buffer. Quads are
/// rebased onto the batch as they are appended, so the data never points
/// back into the draw queue.
#[derive(Debug, Default)]
pub struct BatchBuffer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl BatchBuffer {
    /// Reserves room for `quads` quads.
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// Appends `quad`, stamping `slot` into each vertex.
    pub fn push_quad(&mut self, quad: &DrawQuad, slot: usize) {
        let base = self.vertices.len() as u32;

        self.vertices.extend(quad.vertices.iter().map(|v| Vertex {
            slot: slot as f32,
            ..*v
        }));
        self.indices.extend(quad.indices.iter().map(|&i| base + i));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Drops the contents, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
