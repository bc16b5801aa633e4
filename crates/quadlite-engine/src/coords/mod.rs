//! Coordinate and geometry types shared by the emitters, the shadow utility
//! and the device backends.
//!
//! Canonical CPU space:
//! - World units (mapped to clip space by the active camera)
//! - Origin bottom-left
//! - +X right, +Y up

mod edge;
mod polygon;
mod rect;
mod vec2;
mod viewport;

pub use edge::Edge;
pub use polygon::{three_point_orientation, Orientation, Polygon};
pub use rect::{Rect, UvRect};
pub use vec2::Vec2;
pub use viewport::Viewport;
