use glam::Mat4;

use super::MAX_TEXTURE_SLOTS;

pub const VIEW_UNIFORM: &str = "view";
pub const PROJECTION_UNIFORM: &str = "projection";

/// Sampler uniform names, one per texture slot. Slot `i` reads texture unit `i`.
pub const SLOT_SAMPLER_UNIFORMS: [&str; MAX_TEXTURE_SLOTS] =
    ["uTex0", "uTex1", "uTex2", "uTex3", "uTex4", "uTex5", "uTex6", "uTex7"];

/// Uniform sink of the quad shader.
pub trait ShaderUniforms {
    fn set_mat4(&mut self, name: &str, value: Mat4);
    fn set_int(&mut self, name: &str, value: i32);
}

/// Slot index encoded in a `uTex{n}` uniform name.
pub fn slot_from_sampler_uniform(name: &str) -> Option<usize> {
    name.strip_prefix("uTex")
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&slot| slot < MAX_TEXTURE_SLOTS)
}
