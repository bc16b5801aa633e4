//! quadlite engine crate.
//!
//! A batched 2D quad renderer: geometry emitters, texture slot batching,
//! render targets and a wgpu backend.

pub mod device;
pub mod logging;
pub mod storage;

pub mod coords;
pub mod lighting;
pub mod paint;
pub mod render;
pub mod scene;
