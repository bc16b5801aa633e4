use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::shader::{slot_from_sampler_uniform, PROJECTION_UNIFORM, VIEW_UNIFORM};
use crate::render::{ShaderUniforms, MAX_TEXTURE_SLOTS};

/// Uniform block layout (160 bytes):
///
///  offset   0  view        mat4x4<f32>
///  offset  64  projection  mat4x4<f32>
///  offset 128  slot_units  array<vec4<i32>, 2>
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    slot_units: [[i32; 4]; 2],
}

/// CPU mirror of the quad shader's uniform block.
///
/// Written by the renderer through [`ShaderUniforms`], uploaded by the device
/// right before each draw.
#[derive(Debug, Clone)]
pub struct WgpuShader {
    view: Mat4,
    projection: Mat4,
    slot_units: [i32; MAX_TEXTURE_SLOTS],
}

impl Default for WgpuShader {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            slot_units: std::array::from_fn(|i| i as i32),
        }
    }
}

impl WgpuShader {
    pub(super) fn uniforms(&self) -> QuadUniforms {
        let mut slot_units = [[0; 4]; 2];
        for (slot, &unit) in self.slot_units.iter().enumerate() {
            slot_units[slot / 4][slot % 4] = unit;
        }
        QuadUniforms {
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            slot_units,
        }
    }
}

impl ShaderUniforms for WgpuShader {
    fn set_mat4(&mut self, name: &str, value: Mat4) {
        match name {
            VIEW_UNIFORM => self.view = value,
            PROJECTION_UNIFORM => self.projection = value,
            _ => log::warn!("quad shader has no mat4 uniform '{name}'"),
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        let Some(slot) = slot_from_sampler_uniform(name) else {
            log::warn!("quad shader has no int uniform '{name}'");
            return;
        };
        if !(0..MAX_TEXTURE_SLOTS as i32).contains(&value) {
            log::warn!("texture unit {value} out of range for '{name}'");
            return;
        }
        self.slot_units[slot] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::SLOT_SAMPLER_UNIFORMS;

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<QuadUniforms>(), 160);
    }

    #[test]
    fn slot_units_are_packed_four_per_vector() {
        let mut shader = WgpuShader::default();
        shader.set_int(SLOT_SAMPLER_UNIFORMS[5], 2);
        let u = shader.uniforms();
        assert_eq!(u.slot_units, [[0, 1, 2, 3], [4, 2, 6, 7]]);
    }

    #[test]
    fn unknown_names_and_units_are_ignored() {
        let mut shader = WgpuShader::default();
        shader.set_int("uTex9", 1);
        shader.set_int(SLOT_SAMPLER_UNIFORMS[0], 8);
        shader.set_mat4("model", Mat4::ZERO);
        let u = shader.uniforms();
        assert_eq!(u.slot_units[0][0], 0);
        assert_eq!(u.view, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn matrices_are_stored_column_major() {
        let mut shader = WgpuShader::default();
        let m = Mat4::from_translation(glam::Vec3::new(3.0, 4.0, 0.0));
        shader.set_mat4(PROJECTION_UNIFORM, m);
        assert_eq!(shader.uniforms().projection[3], [3.0, 4.0, 0.0, 1.0]);
    }
}
