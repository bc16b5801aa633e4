//! Per-frame draw queue.
//!
//! Responsibilities:
//! - define the GPU vertex layout shared by every emitter and backend
//! - store emitted quads in submission order (painter's order: later on top)
//! - keep reserved capacity across frames so steady-state frames never allocate

mod quad;
mod queue;

pub use quad::{DrawQuad, Vertex, QUAD_INDICES};
pub use queue::DrawQueue;
