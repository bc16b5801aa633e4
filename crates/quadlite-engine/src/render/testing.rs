//! GPU-less device that records everything the renderer asks of it.

use std::collections::HashMap;

use glam::Mat4;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::scene::Vertex;

use super::{
    RenderDevice, RenderError, RenderTarget, ShaderUniforms, TargetBinding, TargetId, Texture,
    TextureId, MAX_TEXTURE_SLOTS,
};

/// One `draw_indexed` call as the device saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub slots: [TextureId; MAX_TEXTURE_SLOTS],
    pub target: TargetBinding,
    pub viewport: Viewport,
}

impl RecordedBatch {
    /// Texture sampled by each quad, in draw order.
    pub fn quad_textures(&self) -> Vec<TextureId> {
        self.vertices
            .chunks(4)
            .map(|quad| self.slots[quad[0].slot as usize])
            .collect()
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingShader {
    pub mat4s: Vec<(String, Mat4)>,
    pub ints: Vec<(String, i32)>,
}

impl ShaderUniforms for RecordingShader {
    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.mat4s.push((name.to_owned(), value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.ints.push((name.to_owned(), value));
    }
}

#[derive(Debug)]
pub(crate) struct RecordingDevice {
    pub ready: bool,
    pub shader: RecordingShader,
    pub batches: Vec<RecordedBatch>,
    pub clears: Vec<(TargetBinding, Color)>,
    pub target_binds: Vec<TargetBinding>,
    pub texture_binds: usize,
    pub destroyed_textures: Vec<TextureId>,
    pub destroyed_targets: Vec<TargetId>,
    pub screen_size: (u32, u32),
    textures: HashMap<TextureId, (u32, u32, Vec<u8>)>,
    targets: HashMap<TargetId, (u32, u32)>,
    next_id: u32,
    slots: [TextureId; MAX_TEXTURE_SLOTS],
    target: TargetBinding,
    viewport: Viewport,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            ready: true,
            shader: RecordingShader::default(),
            batches: Vec::new(),
            clears: Vec::new(),
            target_binds: Vec::new(),
            texture_binds: 0,
            destroyed_textures: Vec::new(),
            destroyed_targets: Vec::new(),
            screen_size: (4, 4),
            textures: HashMap::new(),
            targets: HashMap::new(),
            next_id: 1,
            slots: [TextureId::INVALID; MAX_TEXTURE_SLOTS],
            target: TargetBinding::Screen,
            viewport: Viewport::default(),
        }
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderDevice for RecordingDevice {
    type Shader = RecordingShader;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn shader_mut(&mut self) -> &mut RecordingShader {
        &mut self.shader
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Texture, RenderError> {
        let id = TextureId(self.next_id());
        self.textures.insert(id, (width, height, rgba.to_vec()));
        Ok(Texture::new(id, width, height))
    }

    fn destroy_texture(&mut self, texture: Texture) {
        self.textures.remove(&texture.id);
        self.destroyed_textures.push(texture.id);
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, RenderError> {
        let texture = self.create_texture(width, height, &vec![0; (width * height * 4) as usize])?;
        let id = TargetId(self.next_id());
        self.targets.insert(id, (width, height));
        Ok(RenderTarget::new(id, texture))
    }

    fn destroy_render_target(&mut self, target: RenderTarget) {
        self.destroy_texture(target.texture());
        self.targets.remove(&target.id());
        self.destroyed_targets.push(target.id());
    }

    fn bind_texture(&mut self, slot: usize, texture: Texture) {
        self.slots[slot] = texture.id;
        self.texture_binds += 1;
    }

    fn bind_target(&mut self, target: TargetBinding) {
        self.target = target;
        self.target_binds.push(target);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn clear(&mut self, target: TargetBinding, color: Color) {
        self.clears.push((target, color));
    }

    fn draw_indexed(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError> {
        self.batches.push(RecordedBatch {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            slots: self.slots,
            target: self.target,
            viewport: self.viewport,
        });
        Ok(())
    }

    fn read_pixels(&mut self, target: TargetBinding) -> Result<(u32, u32, Vec<u8>), RenderError> {
        let (w, h) = match target {
            TargetBinding::Screen => self.screen_size,
            TargetBinding::Offscreen(id) => self
                .targets
                .get(&id)
                .copied()
                .ok_or_else(|| RenderError::Device(format!("unknown render target {id:?}")))?,
        };
        // Row r is filled with value r so orientation is observable.
        let pixels = (0..h).flat_map(|r| std::iter::repeat_n(r as u8, (w * 4) as usize)).collect();
        Ok((w, h, pixels))
    }
}
