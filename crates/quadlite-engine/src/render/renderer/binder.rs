//! Render target binding, frame boundaries and screenshots.

use std::path::PathBuf;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{RenderDevice, RenderError, RenderTarget, TargetBinding};
use crate::storage;

use super::{FlushStats, Renderer};

impl<D: RenderDevice> Renderer<D> {
    /// Redirects drawing to `target`, or back to the screen with `None`.
    ///
    /// Quads already queued are flushed into the previously bound target
    /// first. If they cannot be flushed (no camera), they are discarded so
    /// they never land on the new target. The viewport follows the new
    /// target's size.
    pub fn set_render_target(&mut self, target: Option<&RenderTarget>) -> Result<(), RenderError> {
        if !self.queue.is_empty() {
            self.flush()?;
        }
        if !self.queue.is_empty() {
            log::error!(
                "set_render_target: discarding {} quads that could not be flushed to {:?}",
                self.queue.len(),
                self.target
            );
            self.queue.clear();
        }

        let (binding, viewport) = match target {
            Some(t) => (t.binding(), t.viewport()),
            None => (TargetBinding::Screen, self.window_size),
        };

        if viewport.is_negative() {
            return Err(RenderError::NegativeSurfaceSize {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.device.bind_target(binding);
        self.device.set_viewport(viewport);
        self.target = binding;
        Ok(())
    }

    /// Creates an offscreen target of `width`×`height` pixels, cleared to the
    /// configured clear color.
    pub fn create_render_target(&mut self, width: i32, height: i32) -> Result<RenderTarget, RenderError> {
        if width <= 0 || height <= 0 {
            return Err(RenderError::InvalidTargetSize { width, height });
        }

        let target = self.device.create_render_target(width as u32, height as u32)?;
        self.device.clear(target.binding(), self.config.clear_color);
        log::debug!("created render target {:?} ({width}x{height})", target.id());
        Ok(target)
    }

    /// Releases `target`. If it is currently bound, the screen is bound instead
    /// and anything still queued for it is dropped.
    pub fn destroy_render_target(&mut self, target: RenderTarget) -> Result<(), RenderError> {
        if self.target == target.binding() {
            self.queue.clear();
            self.set_render_target(None)?;
        }
        self.device.destroy_render_target(target);
        Ok(())
    }

    /// Fills `target` with `color`. Pending quads for it are drawn first so the
    /// clear lands after them.
    pub fn clear_render_target(&mut self, target: &RenderTarget, color: Color) -> Result<(), RenderError> {
        if self.target == target.binding() && !self.queue.is_empty() {
            self.flush()?;
        }
        self.device.clear(target.binding(), color);
        Ok(())
    }

    // ── frame ──────────────────────────────────────────────────────────────

    /// Clears the bound target and drops anything left over from the last frame.
    pub fn begin_frame(&mut self) {
        if !self.queue.is_empty() {
            log::warn!("begin_frame: discarding {} unflushed quads", self.queue.len());
            self.queue.clear();
        }
        self.device.clear(self.target, self.config.clear_color);
    }

    pub fn end_frame(&mut self) -> Result<FlushStats, RenderError> {
        self.flush()
    }

    /// Records a new screen size. Applied to the device immediately when the
    /// screen is bound, otherwise on the next switch back to it.
    pub fn update_window_size(&mut self, width: i32, height: i32) {
        self.window_size = Viewport::new(width, height);
        if self.target == TargetBinding::Screen && !self.window_size.is_negative() {
            self.device.set_viewport(self.window_size);
        }
    }

    // ── screenshots ────────────────────────────────────────────────────────

    /// Writes `target` (the screen when `None`) to
    /// `<screenshot_dir>/screenshot<name><N>.png`, picking the first free `N`.
    pub fn save_screenshot(&mut self, target: Option<&RenderTarget>, name: &str) -> Result<PathBuf, RenderError> {
        let binding = target.map_or(TargetBinding::Screen, RenderTarget::binding);
        let (width, height, pixels) = self.device.read_pixels(binding)?;

        storage::ensure_dir(&self.config.screenshot_dir)?;
        let path = storage::next_free_path(&self.config.screenshot_dir, &format!("screenshot{name}"), "png")?;

        image::save_buffer(&path, &pixels, width, height, image::ExtendedColorType::Rgba8)?;
        log::info!("saved screenshot {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::render::testing::RecordingDevice;
    use crate::render::{Camera2d, RendererConfig};

    fn renderer_with(config: RendererConfig) -> Renderer<RecordingDevice> {
        let mut r = Renderer::new(RecordingDevice::new(), config).unwrap();
        r.set_camera(Camera2d::new(800.0, 600.0));
        r
    }

    fn renderer() -> Renderer<RecordingDevice> {
        renderer_with(RendererConfig::default())
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quadlite-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    // ── targets ───────────────────────────────────────────────────────────

    #[test]
    fn switching_target_flushes_into_previous_one() {
        let mut r = renderer();
        let target = r.create_render_target(64, 32).unwrap();
        let tex = r.default_texture();

        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();
        r.set_render_target(Some(&target)).unwrap();

        assert_eq!(r.pending_quads(), 0);
        let first = &r.device().batches[0];
        assert_eq!(first.target, TargetBinding::Screen);
        assert_eq!(first.viewport, Viewport::new(800, 600));

        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();
        r.set_render_target(None).unwrap();

        let second = &r.device().batches[1];
        assert_eq!(second.target, target.binding());
        assert_eq!(second.viewport, Viewport::new(64, 32));
        assert_eq!(r.current_target(), TargetBinding::Screen);
    }

    #[test]
    fn unflushable_quads_are_not_carried_to_the_new_target() {
        let mut r = renderer();
        let target = r.create_render_target(8, 8).unwrap();
        r.clear_camera();
        let tex = r.default_texture();
        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();

        r.set_render_target(Some(&target)).unwrap();

        assert_eq!(r.pending_quads(), 0);
        assert_eq!(r.current_target(), target.binding());

        r.set_camera(Camera2d::new(8.0, 8.0));
        assert_eq!(r.flush().unwrap(), FlushStats::default());
        assert!(r.device().batches.is_empty());
    }

    #[test]
    fn switching_with_empty_queue_submits_nothing() {
        let mut r = renderer();
        let target = r.create_render_target(8, 8).unwrap();
        r.set_render_target(Some(&target)).unwrap();
        r.set_render_target(None).unwrap();
        assert!(r.device().batches.is_empty());
    }

    #[test]
    fn new_target_is_cleared_to_clear_color() {
        let mut r = renderer();
        let target = r.create_render_target(8, 8).unwrap();
        assert_eq!(r.device().clears, vec![(target.binding(), Color::CLEAR)]);
    }

    #[test]
    fn non_positive_target_size_is_rejected() {
        let mut r = renderer();
        assert!(matches!(
            r.create_render_target(0, 10),
            Err(RenderError::InvalidTargetSize { width: 0, height: 10 })
        ));
        assert!(r.create_render_target(10, -1).is_err());
    }

    #[test]
    fn destroying_bound_target_rebinds_screen() {
        let mut r = renderer();
        let target = r.create_render_target(8, 8).unwrap();
        let id = target.id();
        r.set_render_target(Some(&target)).unwrap();

        r.destroy_render_target(target).unwrap();

        assert_eq!(r.current_target(), TargetBinding::Screen);
        assert_eq!(r.device().destroyed_targets, vec![id]);
    }

    #[test]
    fn clearing_bound_target_flushes_first() {
        let mut r = renderer();
        let target = r.create_render_target(8, 8).unwrap();
        r.set_render_target(Some(&target)).unwrap();
        let tex = r.default_texture();
        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();

        r.clear_render_target(&target, Color::BLACK).unwrap();

        assert_eq!(r.device().batches.len(), 1);
        assert_eq!(r.device().clears.last(), Some(&(target.binding(), Color::BLACK)));
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn frame_clears_then_flushes() {
        let mut r = renderer();
        r.begin_frame();
        assert_eq!(r.device().clears, vec![(TargetBinding::Screen, Color::CLEAR)]);

        let tex = r.default_texture();
        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();
        let stats = r.end_frame().unwrap();
        assert_eq!(stats, FlushStats { batches: 1, quads: 1 });
    }

    #[test]
    fn resize_takes_effect_on_next_flush() {
        let mut r = renderer();
        r.update_window_size(320, 240);
        let tex = r.default_texture();
        r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), tex, Color::WHITE).unwrap();
        r.flush().unwrap();
        assert_eq!(r.device().batches[0].viewport, Viewport::new(320, 240));
    }

    // ── screenshots ───────────────────────────────────────────────────────

    #[test]
    fn screenshots_get_increasing_indices() {
        let dir = temp_dir("shots");
        let mut r = renderer_with(RendererConfig { screenshot_dir: dir.clone(), ..RendererConfig::default() });

        let first = r.save_screenshot(None, "_main").unwrap();
        let second = r.save_screenshot(None, "_main").unwrap();

        assert_eq!(first, dir.join("screenshot_main0.png"));
        assert_eq!(second, dir.join("screenshot_main1.png"));

        let img = image::open(&first).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 4));
        // Row order is preserved top-down.
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(0, 3).0, [3, 3, 3, 3]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn screenshot_of_offscreen_target_uses_its_size() {
        let dir = temp_dir("target-shot");
        let mut r = renderer_with(RendererConfig { screenshot_dir: dir.clone(), ..RendererConfig::default() });
        let target = r.create_render_target(6, 2).unwrap();

        let path = r.save_screenshot(Some(&target), "").unwrap();

        assert_eq!(path, dir.join("screenshot0.png"));
        assert_eq!(image::open(&path).unwrap().to_rgba8().dimensions(), (6, 2));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
