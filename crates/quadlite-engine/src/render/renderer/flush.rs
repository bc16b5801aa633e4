//! Flush controller: drains the draw queue into slot-consistent batches.

use crate::render::batch::BatchBuffer;
use crate::render::shader::{PROJECTION_UNIFORM, SLOT_SAMPLER_UNIFORMS, VIEW_UNIFORM};
use crate::render::{RenderDevice, RenderError, ShaderUniforms, SlotsExhausted, TargetBinding, TextureSlots};
use crate::scene::DrawQuad;

use super::Renderer;

/// Outcome of one flush.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// GPU submissions issued.
    pub batches: usize,
    /// Quads drawn across all submissions.
    pub quads: usize,
}

impl<D: RenderDevice> Renderer<D> {
    /// Submits every queued quad, in order, splitting into several batches
    /// whenever the texture slot table fills up.
    ///
    /// The queue is cleared afterwards, whether or not drawing succeeded. The
    /// only exception is a missing camera: that is logged and the queue is
    /// kept for a later flush.
    pub fn flush(&mut self) -> Result<FlushStats, RenderError> {
        if self.window_size.is_negative() {
            return Err(RenderError::NegativeSurfaceSize {
                width: self.window_size.width,
                height: self.window_size.height,
            });
        }

        if !self.device.is_ready() {
            return Err(RenderError::DeviceNotInitialized);
        }

        if self.queue.is_empty() {
            log::warn!("flush: nothing to draw");
            return Ok(FlushStats::default());
        }

        let Some(camera) = self.camera.as_deref() else {
            log::error!("flush: camera not set; keeping {} queued quads", self.queue.len());
            return Ok(FlushStats::default());
        };

        if self.target == TargetBinding::Screen {
            self.device.set_viewport(self.window_size);
        }

        let shader = self.device.shader_mut();
        shader.set_mat4(VIEW_UNIFORM, camera.view_matrix());
        shader.set_mat4(PROJECTION_UNIFORM, camera.projection_matrix());
        for (slot, name) in SLOT_SAMPLER_UNIFORMS.iter().enumerate() {
            shader.set_int(name, slot as i32);
        }

        let result = drain(
            &mut self.device,
            &mut self.batch,
            &mut self.slots,
            self.queue.quads(),
            self.config.max_batch_quads,
        );

        self.batch.clear();
        self.slots.reset();
        self.queue.clear();

        if let Ok(stats) = &result {
            log::debug!("flush: {} quads in {} batches", stats.quads, stats.batches);
        }
        result
    }
}

fn drain<D: RenderDevice>(
    device: &mut D,
    batch: &mut BatchBuffer,
    slots: &mut TextureSlots,
    quads: &[DrawQuad],
    max_batch_quads: usize,
) -> Result<FlushStats, RenderError> {
    let mut stats = FlushStats::default();

    for quad in quads {
        if batch.quad_count() >= max_batch_quads {
            submit(device, batch, slots, &mut stats)?;
        }

        let slot = match slots.assign(quad.texture) {
            Ok(slot) => slot,
            Err(SlotsExhausted) => {
                submit(device, batch, slots, &mut stats)?;
                slots
                    .assign(quad.texture)
                    .map_err(|_| RenderError::SlotExhaustedAfterReset)?
            }
        };

        if slot.newly_bound {
            device.bind_texture(slot.index, quad.texture);
        }

        batch.push_quad(quad, slot.index);
        stats.quads += 1;
    }

    if !batch.is_empty() {
        submit(device, batch, slots, &mut stats)?;
    }

    Ok(stats)
}

fn submit<D: RenderDevice>(
    device: &mut D,
    batch: &mut BatchBuffer,
    slots: &mut TextureSlots,
    stats: &mut FlushStats,
) -> Result<(), RenderError> {
    let result = device.draw_indexed(batch.vertices(), batch.indices());
    batch.clear();
    slots.reset();
    result?;
    stats.batches += 1;
    Ok(())
}
