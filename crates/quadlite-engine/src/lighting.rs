//! Point lights and the shadow volumes polygons cast from them.

use crate::coords::{three_point_orientation, Orientation, Polygon, Vec2};
use crate::paint::Color;

/// How far past the light radius shadow volumes are extruded.
const SHADOW_EXTRUSION: f32 = 100.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightSource {
    pub position: Vec2,
    pub color: Color,
    pub intensity: f32,
    pub radius: f32,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            color: Color::WHITE,
            intensity: 1.0,
            radius: 1.0,
        }
    }
}

/// Shadow volume of one edge.
///
/// `p1 → p2` is the edge itself; `p3` and `p4` are `p2` and `p1` pushed away
/// from the light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowQuad {
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
    pub p4: Vec2,
}

impl ShadowQuad {
    #[inline]
    pub fn points(&self) -> [Vec2; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }
}

impl LightSource {
    pub fn new(position: Vec2, color: Color, intensity: f32, radius: f32) -> Self {
        Self { position, color, intensity, radius }
    }

    /// One quad per edge of `polygon` that has the light on its right-hand side.
    pub fn shadow_quads(&self, polygon: &Polygon) -> Vec<ShadowQuad> {
        let reach = self.radius * SHADOW_EXTRUSION;
        polygon
            .edges()
            .filter(|e| three_point_orientation(e.p1, e.p2, self.position) == Orientation::Clockwise)
            .map(|e| ShadowQuad {
                p1: e.p1,
                p2: e.p2,
                p3: e.p2 + (e.p2 - self.position).normalized() * reach,
                p4: e.p1 + (e.p1 - self.position).normalized() * reach,
            })
            .collect()
    }
}

/// Splits each quad into two triangles, three points per triangle.
pub fn shadow_triangles(quads: &[ShadowQuad]) -> Vec<Vec2> {
    quads
        .iter()
        .flat_map(|q| [q.p1, q.p2, q.p3, q.p1, q.p3, q.p4])
        .collect()
}
