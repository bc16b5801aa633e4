//! Color model shared by the emitters and the device backends.
//!
//! Colors are linear premultiplied RGBA and travel to the GPU per vertex.
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
