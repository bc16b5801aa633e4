use glam::{Mat4, Vec3};

use crate::coords::Vec2;

/// Source of the view and projection matrices used for a flush.
pub trait Camera {
    fn view_matrix(&self) -> Mat4;
    fn projection_matrix(&self) -> Mat4;
}

/// Orthographic 2D camera.
///
/// `position` is the world point shown at the bottom-left of the viewport;
/// `size` is the visible extent in world units at zoom 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    pub size: Vec2,
    pub zoom: f32,
}

impl Camera2d {
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::zero(),
            size: Vec2::new(width, height),
            zoom: 1.0,
        }
    }
}

impl Camera for Camera2d {
    fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    fn projection_matrix(&self) -> Mat4 {
        let zoom = self.zoom.max(f32::EPSILON);
        Mat4::orthographic_rh(0.0, self.size.x / zoom, 0.0, self.size.y / zoom, -1.0, 1.0)
    }
}
