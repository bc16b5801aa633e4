use crate::coords::Viewport;
use crate::paint::Color;
use crate::scene::Vertex;

use super::{RenderError, RenderTarget, ShaderUniforms, TargetBinding, Texture};

/// Graphics device driven by the renderer.
///
/// All calls happen on the render thread and are treated as synchronous: once
/// `draw_indexed` returns, the batch is committed and the slices may be reused.
pub trait RenderDevice {
    type Shader: ShaderUniforms;

    /// `false` until the device objects backing `draw_indexed` exist.
    fn is_ready(&self) -> bool;

    fn shader_mut(&mut self) -> &mut Self::Shader;

    /// Uploads tightly packed, top-down RGBA8 pixels (premultiplied).
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Texture, RenderError>;

    fn destroy_texture(&mut self, texture: Texture);

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, RenderError>;

    fn destroy_render_target(&mut self, target: RenderTarget);

    /// Makes `texture` readable through texture unit `slot` for the next draws.
    fn bind_texture(&mut self, slot: usize, texture: Texture);

    fn bind_target(&mut self, target: TargetBinding);

    fn set_viewport(&mut self, viewport: Viewport);

    fn clear(&mut self, target: TargetBinding, color: Color);

    /// Uploads both buffers wholesale and draws them as an indexed triangle
    /// list into the bound target.
    fn draw_indexed(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError>;

    /// Reads back `target` as tightly packed, top-down RGBA8 rows.
    fn read_pixels(&mut self, target: TargetBinding) -> Result<(u32, u32, Vec<u8>), RenderError>;
}
