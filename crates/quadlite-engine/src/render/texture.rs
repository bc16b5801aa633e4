/// Device-assigned texture identifier. `0` means "unloaded".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    pub const INVALID: TextureId = TextureId(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Handle to a texture living on a [`RenderDevice`](super::RenderDevice).
///
/// Cheap to copy; the pixel storage is owned by the device and released with
/// `RenderDevice::destroy_texture`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    #[inline]
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.id.is_valid()
    }
}
