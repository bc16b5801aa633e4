//! wgpu implementation of [`RenderDevice`].
//!
//! Every texture and render target lives in one id-keyed table. The screen
//! is an offscreen backbuffer owned by the device; callers read it back with
//! `read_pixels` or copy from [`WgpuDevice::screen_texture`].
//!
//! Each `draw_indexed` and `clear` records its own encoder and submits
//! immediately, so queue writes for the next batch never race the previous one.

mod pipeline;
mod readback;
mod shader;

use std::collections::HashMap;

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::paint::Color;
use crate::scene::Vertex;

use super::{
    RenderDevice, RenderError, RenderTarget, TargetBinding, TargetId, Texture, TextureId,
    MAX_TEXTURE_SLOTS,
};
use pipeline::{QuadPipeline, FIRST_TEXTURE_BINDING, SAMPLER_BINDING, UNIFORM_BINDING};
use shader::QuadUniforms;

pub use shader::WgpuShader;

/// Minimum vertex/index buffer size, in quads.
const MIN_BUFFER_QUADS: usize = 64;

/// Backend parameters.
#[derive(Debug, Clone)]
pub struct WgpuDeviceConfig {
    /// Format of the screen backbuffer and of every render target.
    pub color_format: wgpu::TextureFormat,

    /// Screen backbuffer size in pixels.
    pub screen_size: (u32, u32),
}

impl Default for WgpuDeviceConfig {
    fn default() -> Self {
        Self {
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            screen_size: (800, 600),
        }
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Renders through wgpu into textures it owns.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,

    quad: QuadPipeline,
    shader: WgpuShader,
    uniform_buffer: wgpu::Buffer,

    // geometry
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    buffer_quads: usize,

    // resources
    textures: HashMap<TextureId, GpuTexture>,
    targets: HashMap<TargetId, TextureId>,
    screen: GpuTexture,
    fallback: GpuTexture,
    next_id: u32,

    // bound state
    slots: [TextureId; MAX_TEXTURE_SLOTS],
    target: TargetBinding,
    viewport: Viewport,
}

impl WgpuDevice {
    pub fn new(gpu: &Gpu, config: WgpuDeviceConfig) -> Result<Self, RenderError> {
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();
        let (width, height) = config.screen_size;
        if width == 0 || height == 0 {
            return Err(RenderError::Device(format!("screen size must be non-zero, got {width}x{height}")));
        }

        let quad = QuadPipeline::new(&device, config.color_format);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadlite uniforms"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen = create_color_texture(&device, "quadlite screen", width, height, config.color_format, true);
        let fallback = create_color_texture(&device, "quadlite fallback", 1, 1, wgpu::TextureFormat::Rgba8Unorm, false);
        write_rgba(&queue, &fallback.texture, 1, 1, &[255; 4]);

        log::debug!(
            "wgpu device ready: {width}x{height} screen, {:?}",
            config.color_format
        );

        Ok(Self {
            device,
            queue,
            color_format: config.color_format,
            quad,
            shader: WgpuShader::default(),
            uniform_buffer,
            vertex_buffer: None,
            index_buffer: None,
            buffer_quads: 0,
            textures: HashMap::new(),
            targets: HashMap::new(),
            screen,
            fallback,
            next_id: 1,
            slots: [TextureId::INVALID; MAX_TEXTURE_SLOTS],
            target: TargetBinding::Screen,
            viewport: Viewport::new(width as i32, height as i32),
        })
    }

    /// Screen backbuffer, for presenting or copying elsewhere.
    pub fn screen_texture(&self) -> &wgpu::Texture {
        &self.screen.texture
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen.width, self.screen.height)
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn target_texture(&self, target: TargetBinding) -> Result<&GpuTexture, RenderError> {
        match target {
            TargetBinding::Screen => Ok(&self.screen),
            TargetBinding::Offscreen(id) => self
                .targets
                .get(&id)
                .and_then(|tex| self.textures.get(tex))
                .ok_or_else(|| RenderError::Device(format!("unknown render target {id:?}"))),
        }
    }

    fn ensure_buffer_capacity(&mut self, quads: usize) {
        if quads <= self.buffer_quads && self.vertex_buffer.is_some() && self.index_buffer.is_some() {
            return;
        }
        let new_cap = quads.next_power_of_two().max(MIN_BUFFER_QUADS);
        self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadlite vbo"),
            size: (new_cap * 4 * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.index_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadlite ibo"),
            size: (new_cap * 6 * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.buffer_quads = new_cap;
    }

    /// Views for every slot; unbound or unused slots read the 1x1 white fallback.
    fn slot_views(&self, used: &[bool; MAX_TEXTURE_SLOTS]) -> Result<Vec<&wgpu::TextureView>, RenderError> {
        let attachment = match self.target {
            TargetBinding::Screen => None,
            TargetBinding::Offscreen(id) => self.targets.get(&id).copied(),
        };

        if let Some(id) = sampled_attachment(&self.slots, used, attachment) {
            return Err(RenderError::Device(format!(
                "texture {id:?} is sampled while bound as the render target"
            )));
        }

        Ok(self
            .slots
            .iter()
            .zip(used)
            .map(|(id, &in_use)| match self.textures.get(id) {
                Some(t) if in_use && Some(*id) != attachment => &t.view,
                _ => &self.fallback.view,
            })
            .collect())
    }

    fn draw_batch(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError> {
        if indices.is_empty() {
            return Ok(());
        }

        self.ensure_buffer_capacity(vertices.len().div_ceil(4).max(indices.len().div_ceil(6)));
        let (Some(vbo), Some(ibo)) = (self.vertex_buffer.as_ref(), self.index_buffer.as_ref()) else {
            return Err(RenderError::DeviceNotInitialized);
        };

        self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
        self.queue.write_buffer(ibo, 0, bytemuck::cast_slice(indices));
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.shader.uniforms()));

        let target = self.target_texture(self.target)?;
        let Some((vw, vh)) = self.pass_viewport(target) else {
            log::warn!("draw skipped: empty viewport {:?}", self.viewport);
            return Ok(());
        };

        let views = self.slot_views(&used_slots(vertices))?;
        let mut entries = Vec::with_capacity(MAX_TEXTURE_SLOTS + 2);
        entries.push(wgpu::BindGroupEntry {
            binding: UNIFORM_BINDING,
            resource: self.uniform_buffer.as_entire_binding(),
        });
        entries.extend(views.into_iter().enumerate().map(|(i, view)| wgpu::BindGroupEntry {
            binding: FIRST_TEXTURE_BINDING + i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        }));
        entries.push(wgpu::BindGroupEntry {
            binding: SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(&self.quad.sampler),
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadlite batch bind group"),
            layout: &self.quad.bind_group_layout,
            entries: &entries,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quadlite batch encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadlite batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.quad.pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.set_viewport(0.0, 0.0, vw, vh, 0.0, 1.0);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..indices.len() as u32, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Viewport clamped to the target, in wgpu's top-left pixel space.
    fn pass_viewport(&self, target: &GpuTexture) -> Option<(f32, f32)> {
        let w = (self.viewport.width.max(0) as u32).min(target.width);
        let h = (self.viewport.height.max(0) as u32).min(target.height);
        (w > 0 && h > 0).then_some((w as f32, h as f32))
    }
}

impl RenderDevice for WgpuDevice {
    type Shader = WgpuShader;

    fn is_ready(&self) -> bool {
        true
    }

    fn shader_mut(&mut self) -> &mut WgpuShader {
        &mut self.shader
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Texture, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Device(format!("texture size must be non-zero, got {width}x{height}")));
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::Device(format!(
                "texture data is {} bytes, expected {expected} for {width}x{height} RGBA8",
                rgba.len()
            )));
        }

        let tex = create_color_texture(&self.device, "quadlite texture", width, height, wgpu::TextureFormat::Rgba8Unorm, false);
        write_rgba(&self.queue, &tex.texture, width, height, rgba);

        let id = TextureId(self.next_id());
        self.textures.insert(id, tex);
        Ok(Texture::new(id, width, height))
    }

    fn destroy_texture(&mut self, texture: Texture) {
        if let Some(tex) = self.textures.remove(&texture.id) {
            tex.texture.destroy();
        }
        for slot in &mut self.slots {
            if *slot == texture.id {
                *slot = TextureId::INVALID;
            }
        }
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Device(format!("target size must be non-zero, got {width}x{height}")));
        }
        let tex = create_color_texture(&self.device, "quadlite render target", width, height, self.color_format, true);

        let texture_id = TextureId(self.next_id());
        self.textures.insert(texture_id, tex);

        let target_id = TargetId(self.next_id());
        self.targets.insert(target_id, texture_id);

        Ok(RenderTarget::new(target_id, Texture::new(texture_id, width, height)))
    }

    fn destroy_render_target(&mut self, target: RenderTarget) {
        self.targets.remove(&target.id());
        self.destroy_texture(target.texture());
        if self.target == target.binding() {
            self.target = TargetBinding::Screen;
        }
    }

    fn bind_texture(&mut self, slot: usize, texture: Texture) {
        match self.slots.get_mut(slot) {
            Some(s) => *s = texture.id,
            None => log::error!("texture slot {slot} out of range"),
        }
    }

    fn bind_target(&mut self, target: TargetBinding) {
        self.target = target;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn clear(&mut self, target: TargetBinding, color: Color) {
        let view = match self.target_texture(target) {
            Ok(t) => &t.view,
            Err(e) => {
                log::error!("clear: {e}");
                return;
            }
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quadlite clear encoder"),
        });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadlite clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(color.r),
                            g: f64::from(color.g),
                            b: f64::from(color.b),
                            a: f64::from(color.a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_indexed(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError> {
        let result = self.draw_batch(vertices, indices);
        // Slot bindings last one batch; the renderer rebinds for the next.
        self.slots = [TextureId::INVALID; MAX_TEXTURE_SLOTS];
        result
    }

    fn read_pixels(&mut self, target: TargetBinding) -> Result<(u32, u32, Vec<u8>), RenderError> {
        let tex = self.target_texture(target)?;
        let (width, height) = (tex.width, tex.height);
        let mut pixels = readback::read_texture(&self.device, &self.queue, &tex.texture, width, height)?;

        match self.color_format {
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
                readback::bgra_to_rgba(&mut pixels);
            }
            _ => {}
        }
        Ok((width, height, pixels))
    }
}

// ── slot helpers ──────────────────────────────────────────────────────────

/// Slots referenced by at least one vertex of the batch.
fn used_slots(vertices: &[Vertex]) -> [bool; MAX_TEXTURE_SLOTS] {
    let mut used = [false; MAX_TEXTURE_SLOTS];
    for v in vertices {
        if let Some(u) = used.get_mut(v.slot as usize) {
            *u = true;
        }
    }
    used
}

/// Texture that a used slot samples while it is also the bound attachment.
fn sampled_attachment(
    slots: &[TextureId; MAX_TEXTURE_SLOTS],
    used: &[bool; MAX_TEXTURE_SLOTS],
    attachment: Option<TextureId>,
) -> Option<TextureId> {
    let attachment = attachment?;
    slots
        .iter()
        .zip(used)
        .find(|&(&id, &in_use)| in_use && id == attachment)
        .map(|(&id, _)| id)
}

// ── texture helpers ───────────────────────────────────────────────────────

fn create_color_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    renderable: bool,
) -> GpuTexture {
    let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
    if renderable {
        usage |= wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    GpuTexture { texture, view, width, height }
}

fn write_rgba(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, rgba: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
}
