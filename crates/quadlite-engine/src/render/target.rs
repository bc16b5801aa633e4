use crate::coords::Viewport;

use super::Texture;

/// Device-assigned framebuffer identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TargetId(pub u32);

/// Output surface a batch is drawn into.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TargetBinding {
    /// The window backbuffer.
    #[default]
    Screen,
    Offscreen(TargetId),
}

/// Offscreen surface: a framebuffer plus the texture backing it.
///
/// Owning handle. Not `Clone`: it is created by a device and must be handed
/// back with `Renderer::destroy_render_target`. Its size is fixed.
#[derive(Debug, PartialEq, Eq)]
pub struct RenderTarget {
    id: TargetId,
    texture: Texture,
}

impl RenderTarget {
    /// Wraps a framebuffer created by a [`RenderDevice`](super::RenderDevice).
    #[inline]
    pub fn new(id: TargetId, texture: Texture) -> Self {
        Self { id, texture }
    }

    #[inline]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Color attachment. Drawable with `draw_rect` once this target is unbound.
    #[inline]
    pub fn texture(&self) -> Texture {
        self.texture
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width, self.texture.height)
    }

    #[inline]
    pub fn binding(&self) -> TargetBinding {
        TargetBinding::Offscreen(self.id)
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.texture.width as i32, self.texture.height as i32)
    }
}
