//! Batched quad renderer.
//!
//! Frame flow:
//! - emitters (`draw_*`) append quads to the draw queue, no device work
//! - `flush` drains the queue through the slot table into batches and
//!   submits each batch to the device
//! - switching render targets flushes first so queued work lands on the
//!   surface that was bound when it was issued

mod binder;
mod emit;
mod flush;

use std::path::PathBuf;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::scene::DrawQueue;

use super::batch::BatchBuffer;
use super::font::{self, Font};
use super::{Camera, RenderDevice, RenderError, TargetBinding, Texture, TextureSlots};

pub use flush::FlushStats;

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Quads a typical frame emits. Sizes the reserved queue capacity.
    pub expected_quads: usize,

    /// Upper bound on quads per GPU submission.
    pub max_batch_quads: usize,

    /// Initial screen size in pixels.
    pub window_size: (i32, i32),

    /// Color used by `begin_frame` and for freshly created render targets.
    pub clear_color: Color,

    /// Rasterization size used by `load_default_font`.
    pub default_font_size: f32,

    /// Directory receiving `save_screenshot` output.
    pub screenshot_dir: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            expected_quads: 10_000,
            max_batch_quads: 10_000,
            window_size: (800, 600),
            clear_color: Color::CLEAR,
            default_font_size: 16.0,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

/// Owns the draw queue, the batch being built and the default resources,
/// and drives one [`RenderDevice`].
pub struct Renderer<D: RenderDevice> {
    device: D,
    config: RendererConfig,

    queue: DrawQueue,
    batch: BatchBuffer,
    slots: TextureSlots,

    camera: Option<Box<dyn Camera>>,

    default_texture: Texture,
    default_font: Option<Font>,

    window_size: Viewport,
    target: TargetBinding,
}

impl<D: RenderDevice> Renderer<D> {
    /// Creates the renderer and its default white texture, and binds the screen.
    pub fn new(mut device: D, config: RendererConfig) -> Result<Self, RenderError> {
        if !device.is_ready() {
            return Err(RenderError::DeviceNotInitialized);
        }

        let default_texture = device.create_texture(1, 1, &[255, 255, 255, 255])?;

        let window_size = Viewport::new(config.window_size.0, config.window_size.1);
        device.bind_target(TargetBinding::Screen);
        if !window_size.is_negative() {
            device.set_viewport(window_size);
        }

        let max_batch_quads = config.max_batch_quads.max(1);
        log::debug!(
            "renderer initialized: {} expected quads, {} quads per batch max",
            config.expected_quads,
            max_batch_quads
        );

        Ok(Self {
            queue: DrawQueue::with_capacity(config.expected_quads),
            batch: BatchBuffer::with_capacity(config.expected_quads.min(max_batch_quads)),
            slots: TextureSlots::new(),
            camera: None,
            default_texture,
            default_font: None,
            window_size,
            target: TargetBinding::Screen,
            config: RendererConfig { max_batch_quads, ..config },
            device,
        })
    }

    /// Releases the default resources and hands the device back.
    pub fn shutdown(self) -> D {
        let Renderer { mut device, default_texture, default_font, .. } = self;
        if let Some(font) = default_font {
            device.destroy_texture(font.texture());
        }
        device.destroy_texture(default_texture);
        log::debug!("renderer shut down");
        device
    }

    // ── collaborators ──────────────────────────────────────────────────────

    pub fn set_camera(&mut self, camera: impl Camera + 'static) {
        self.camera = Some(Box::new(camera));
    }

    pub fn camera(&self) -> Option<&dyn Camera> {
        self.camera.as_deref()
    }

    /// Removes the camera; flushes are refused until a new one is set.
    pub fn clear_camera(&mut self) {
        self.camera = None;
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    // ── default resources ──────────────────────────────────────────────────

    #[inline]
    pub fn default_texture(&self) -> Texture {
        self.default_texture
    }

    #[inline]
    pub fn default_font(&self) -> Option<&Font> {
        self.default_font.as_ref()
    }

    /// Uploads an RGBA8 image as a texture usable with `draw_rect`.
    pub fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Texture, RenderError> {
        self.device.create_texture(width, height, rgba)
    }

    pub fn destroy_texture(&mut self, texture: Texture) {
        self.device.destroy_texture(texture);
    }

    /// Rasterizes printable ASCII from `bytes` at `size` pixels and uploads the atlas.
    pub fn load_font(&mut self, bytes: &[u8], size: f32) -> Result<Font, RenderError> {
        let atlas = font::rasterize_ascii(bytes, size)?;
        let texture = self.device.create_texture(atlas.width, atlas.height, &atlas.pixels)?;
        Ok(Font::from_glyphs(texture, size, atlas.glyphs))
    }

    pub fn destroy_font(&mut self, font: Font) {
        self.device.destroy_texture(font.texture());
    }

    /// Loads the font used by `draw_text`, replacing any previous default.
    pub fn load_default_font(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        let font = self.load_font(bytes, self.config.default_font_size)?;
        self.set_default_font(font);
        Ok(())
    }

    /// Installs an already-built font as the default, releasing the atlas of
    /// the one it replaces.
    pub fn set_default_font(&mut self, font: Font) {
        if let Some(old) = self.default_font.replace(font) {
            self.device.destroy_texture(old.texture());
        }
    }

    // ── queue state ────────────────────────────────────────────────────────

    /// Quads emitted since the last flush.
    #[inline]
    pub fn pending_quads(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn current_target(&self) -> TargetBinding {
        self.target
    }

    #[inline]
    pub fn window_size(&self) -> Viewport {
        self.window_size
    }
}
