//! Batched quad rendering.
//!
//! The [`Renderer`] queues quads emitted by its `draw_*` calls and turns them
//! into as few device submissions as the texture slot limit allows. It talks
//! to the GPU only through [`RenderDevice`]; [`WgpuDevice`] is the wgpu backend.
//!
//! Convention:
//! - world space is +Y up; the camera maps it to clip space
//! - texture pixels are uploaded top-down, so [`UvRect::FULL`](crate::coords::UvRect::FULL)
//!   samples them upright

mod batch;
mod camera;
mod device;
mod error;
mod font;
mod gpu;
mod renderer;
mod shader;
mod slots;
mod target;
mod texture;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchBuffer;
pub use camera::{Camera, Camera2d};
pub use device::RenderDevice;
pub use error::RenderError;
pub use font::{rasterize_ascii, Font, FontAtlas, Glyph};
pub use gpu::{WgpuDevice, WgpuDeviceConfig, WgpuShader};
pub use renderer::{FlushStats, Renderer, RendererConfig};
pub use shader::{
    slot_from_sampler_uniform, ShaderUniforms, PROJECTION_UNIFORM, SLOT_SAMPLER_UNIFORMS, VIEW_UNIFORM,
};
pub use slots::{SlotAssignment, SlotsExhausted, TextureSlots, MAX_TEXTURE_SLOTS};
pub use target::{RenderTarget, TargetBinding, TargetId};
pub use texture::{Texture, TextureId};
