use super::DrawQuad;

/// Ordered quads recorded during a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps the allocation, so a warmed-up queue never reallocates
///   unless a frame exceeds every previous frame
///
/// Insertion order is draw order; nothing here reorders.
#[derive(Debug, Default)]
pub struct DrawQueue {
    quads: Vec<DrawQuad>,
}

impl DrawQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue with room for `expected_quads` without reallocating.
    #[inline]
    pub fn with_capacity(expected_quads: usize) -> Self {
        Self {
            quads: Vec::with_capacity(expected_quads),
        }
    }

    /// Clears recorded quads. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.quads.clear();
    }

    #[inline]
    pub fn push(&mut self, quad: DrawQuad) {
        self.quads.push(quad);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.quads.capacity()
    }

    /// Returns quads in insertion order.
    #[inline]
    pub fn quads(&self) -> &[DrawQuad] {
        &self.quads
    }
}
