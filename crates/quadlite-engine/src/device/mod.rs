//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - exposing them to the render backend
//!
//! Output goes to offscreen textures owned by the backend, so no surface or
//! window is involved.

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
