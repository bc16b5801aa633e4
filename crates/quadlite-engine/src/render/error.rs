use thiserror::Error;

/// Renderer failures.
///
/// Every variant except `Io`/`Image`/`FontLoad` is a broken initialization
/// contract: the caller is expected to stop the frame loop. Recoverable
/// conditions (empty queue, missing camera, invalid polygon, missing glyph)
/// are logged and never surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{op}: texture not loaded (id 0)")]
    InvalidTexture { op: &'static str },

    #[error("{op}: default texture not loaded")]
    DefaultTextureMissing { op: &'static str },

    #[error("render device not initialized")]
    DeviceNotInitialized,

    #[error("surface size is negative ({width}x{height})")]
    NegativeSurfaceSize { width: i32, height: i32 },

    #[error("invalid render target size ({width}x{height})")]
    InvalidTargetSize { width: i32, height: i32 },

    #[error("texture slot table full even after batch submission")]
    SlotExhaustedAfterReset,

    #[error("render device error: {0}")]
    Device(String),

    #[error("font load error: {0}")]
    FontLoad(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
