//! Geometry emitters. Every primitive becomes one or more quads on the draw
//! queue; nothing touches the device until the next flush.

use crate::coords::{Edge, Polygon, Rect, UvRect, Vec2};
use crate::lighting::LightSource;
use crate::paint::Color;
use crate::render::{Font, RenderDevice, RenderError, Texture};
use crate::scene::{DrawQuad, Vertex};

use super::Renderer;

const LINE_UV: UvRect = UvRect::new(0.0, 0.0, 1.0, 1.0);
const FLAT_UV: [[f32; 2]; 4] = [[0.0, 0.0]; 4];

impl<D: RenderDevice> Renderer<D> {
    /// Queues a textured rectangle. `colors` follow [`Rect::corners`] order
    /// (bottom-left first, counter-clockwise).
    pub fn draw_rect(
        &mut self,
        rect: Rect,
        texture: Texture,
        colors: [Color; 4],
        uv: UvRect,
    ) -> Result<(), RenderError> {
        if !texture.is_valid() {
            return Err(RenderError::InvalidTexture { op: "draw_rect" });
        }

        let corners = rect.corners();
        let uvs = uv.corners();
        let vertices = std::array::from_fn(|i| Vertex::new(corners[i], uvs[i], colors[i]));
        self.queue.push(DrawQuad::new(vertices, texture));
        Ok(())
    }

    /// Single-color rectangle showing the whole texture.
    pub fn draw_rect_solid(&mut self, rect: Rect, texture: Texture, color: Color) -> Result<(), RenderError> {
        self.draw_rect(rect, texture, [color; 4], UvRect::FULL)
    }

    /// Queues a segment `width` units thick, centered on `edge`.
    pub fn draw_line(&mut self, edge: Edge, width: f32, color: Color) -> Result<(), RenderError> {
        let texture = self.require_default_texture("draw_line")?;

        let half = edge.normal() * (width / 2.0);
        let points = [edge.p1 + half, edge.p2 + half, edge.p2 - half, edge.p1 - half];
        self.push_points(points, LINE_UV.corners(), color, texture);
        Ok(())
    }

    /// Queues a filled polygon as a triangle fan around vertex 0.
    ///
    /// The fan is grouped two triangles per quad, `(0,1,2,3), (0,3,4,5), ...`;
    /// an odd triangle count repeats the last vertex to close the final quad.
    /// Only convex polygons are guaranteed to fill correctly. Invalid polygons
    /// are logged and skipped.
    pub fn draw_polygon(&mut self, polygon: &Polygon, color: Color) -> Result<(), RenderError> {
        let texture = self.require_default_texture("draw_polygon")?;

        if !polygon.is_valid() {
            log::error!("draw_polygon: polygon is not valid ({} vertices)", polygon.len());
            return Ok(());
        }

        let v = &polygon.vertices;
        let last = v.len() - 1;
        let at = |k: usize| v[k.min(last)];

        let triangles = v.len() - 2;
        for i in 0..triangles.div_ceil(2) {
            let points = [v[0], at(2 * i + 1), at(2 * i + 2), at(2 * i + 3)];
            self.push_points(points, FLAT_UV, color, texture);
        }
        Ok(())
    }

    /// Queues one line per polygon edge, including the closing edge.
    pub fn draw_polygon_outline(&mut self, polygon: &Polygon, width: f32, color: Color) -> Result<(), RenderError> {
        self.require_default_texture("draw_polygon_outline")?;

        if !polygon.is_valid() {
            log::error!("draw_polygon_outline: polygon is not valid ({} vertices)", polygon.len());
            return Ok(());
        }

        for edge in polygon.edges() {
            self.draw_line(edge, width, color)?;
        }
        Ok(())
    }

    /// Queues one rectangle per glyph of `text`.
    ///
    /// `position` is the top-left of the first line; `scale` is the line
    /// height in world units. `\n` starts a new line, characters missing from
    /// the font are skipped.
    pub fn draw_string(
        &mut self,
        text: &str,
        position: Vec2,
        font: &Font,
        color: Color,
        scale: f32,
    ) -> Result<(), RenderError> {
        if !font.is_loaded() {
            log::error!("draw_string: font is not loaded");
            return Ok(());
        }

        let factor = scale / font.size();
        let mut x = position.x;
        let mut y = position.y - scale;

        for c in text.chars() {
            if c == '\n' {
                x = position.x;
                y -= scale;
                continue;
            }

            let Some(glyph) = font.glyph(c) else {
                log::trace!("draw_string: no glyph for {c:?}");
                continue;
            };

            let rect = Rect::new(
                x + glyph.bearing.x * factor,
                y - (glyph.size.y - glyph.bearing.y) * factor,
                glyph.size.x * factor,
                glyph.size.y * factor,
            );
            self.draw_rect(rect, font.texture(), [color; 4], glyph.uv)?;

            x += glyph.advance * factor;
        }
        Ok(())
    }

    /// [`draw_string`](Self::draw_string) with the default font.
    pub fn draw_text(&mut self, text: &str, position: Vec2, color: Color, scale: f32) -> Result<(), RenderError> {
        let Some(font) = self.default_font.take() else {
            log::error!("draw_text: no default font loaded");
            return Ok(());
        };
        let result = self.draw_string(text, position, &font, color, scale);
        self.default_font = Some(font);
        result
    }

    /// Queues the shadow volumes `polygon` casts away from `light`.
    pub fn draw_shadows(&mut self, light: &LightSource, polygon: &Polygon, color: Color) -> Result<(), RenderError> {
        let texture = self.require_default_texture("draw_shadows")?;

        for quad in light.shadow_quads(polygon) {
            self.push_points(quad.points(), FLAT_UV, color, texture);
        }
        Ok(())
    }

    fn require_default_texture(&self, op: &'static str) -> Result<Texture, RenderError> {
        if self.default_texture.is_valid() {
            Ok(self.default_texture)
        } else {
            Err(RenderError::DefaultTextureMissing { op })
        }
    }

    fn push_points(&mut self, points: [Vec2; 4], uvs: [[f32; 2]; 4], color: Color, texture: Texture) {
        let vertices = std::array::from_fn(|i| Vertex::new(points[i], uvs[i], color));
        self.queue.push(DrawQuad::new(vertices, texture));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::render::testing::RecordingDevice;
    use crate::render::{Glyph, RendererConfig, TextureId};

    fn renderer() -> Renderer<RecordingDevice> {
        Renderer::new(RecordingDevice::new(), RendererConfig::default()).unwrap()
    }

    fn poly(points: &[(f32, f32)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    fn font() -> Font {
        let glyph = |advance: f32| Glyph {
            bearing: Vec2::new(1.0, 8.0),
            size: Vec2::new(6.0, 10.0),
            advance,
            uv: UvRect::new(0.0, 1.0, 0.5, 0.0),
        };
        let mut glyphs = HashMap::new();
        glyphs.insert('A', glyph(8.0));
        glyphs.insert('B', glyph(9.0));
        Font::from_glyphs(Texture::new(TextureId(77), 64, 64), 16.0, glyphs)
    }

    fn positions(quad: &DrawQuad) -> Vec<[f32; 2]> {
        quad.vertices.iter().map(|v| v.pos).collect()
    }

    // ── draw_rect ─────────────────────────────────────────────────────────

    #[test]
    fn rect_emits_one_quad_with_corner_attributes() {
        let mut r = renderer();
        let tex = r.default_texture();
        let colors = [Color::WHITE, Color::BLACK, Color::TRANSPARENT, Color::CLEAR];
        let uv = UvRect::new(0.0, 0.25, 0.5, 0.75);
        r.draw_rect(Rect::new(1.0, 2.0, 3.0, 4.0), tex, colors, uv).unwrap();

        assert_eq!(r.pending_quads(), 1);
        let quad = &r.queue.quads()[0];
        assert_eq!(positions(quad), vec![[1.0, 2.0], [4.0, 2.0], [4.0, 6.0], [1.0, 6.0]]);
        assert_eq!(quad.vertices[0].uv, [0.0, 0.25]);
        assert_eq!(quad.vertices[2].uv, [0.5, 0.75]);
        assert_eq!(quad.vertices[1].color, Color::BLACK.to_array());
        assert_eq!(quad.vertices[3].color, Color::CLEAR.to_array());
        assert_eq!(quad.texture, tex);
    }

    #[test]
    fn rect_with_unloaded_texture_is_fatal() {
        let mut r = renderer();
        let err = r.draw_rect_solid(Rect::new(0.0, 0.0, 1.0, 1.0), Texture::default(), Color::WHITE);
        assert!(matches!(err, Err(RenderError::InvalidTexture { op: "draw_rect" })));
        assert_eq!(r.pending_quads(), 0);
    }

    // ── draw_line ─────────────────────────────────────────────────────────

    #[test]
    fn line_is_offset_by_half_width_along_normal() {
        let mut r = renderer();
        let edge = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        r.draw_line(edge, 2.0, Color::WHITE).unwrap();

        let quad = &r.queue.quads()[0];
        assert_eq!(positions(quad), vec![[0.0, -1.0], [10.0, -1.0], [10.0, 1.0], [0.0, 1.0]]);
        assert_eq!(quad.texture, r.default_texture());
    }

    #[test]
    fn line_without_default_texture_is_fatal() {
        let mut r = renderer();
        r.default_texture = Texture::default();
        let edge = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let err = r.draw_line(edge, 1.0, Color::WHITE);
        assert!(matches!(err, Err(RenderError::DefaultTextureMissing { op: "draw_line" })));
    }

    // ── draw_polygon ──────────────────────────────────────────────────────

    #[test]
    fn quad_polygon_is_a_single_quad() {
        let mut r = renderer();
        r.draw_polygon(&poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]), Color::WHITE).unwrap();
        assert_eq!(r.pending_quads(), 1);
    }

    #[test]
    fn triangle_duplicates_last_vertex() {
        let mut r = renderer();
        r.draw_polygon(&poly(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]), Color::WHITE).unwrap();

        assert_eq!(r.pending_quads(), 1);
        let p = positions(&r.queue.quads()[0]);
        assert_eq!(p, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn pentagon_fans_around_first_vertex() {
        let mut r = renderer();
        let pentagon = poly(&[(0.0, 0.0), (2.0, 0.0), (3.0, 1.0), (1.0, 2.0), (-1.0, 1.0)]);
        r.draw_polygon(&pentagon, Color::WHITE).unwrap();

        // 3 triangles: one full quad plus one padded quad.
        assert_eq!(r.pending_quads(), 2);
        let first = positions(&r.queue.quads()[0]);
        let second = positions(&r.queue.quads()[1]);
        assert_eq!(first, vec![[0.0, 0.0], [2.0, 0.0], [3.0, 1.0], [1.0, 2.0]]);
        assert_eq!(second, vec![[0.0, 0.0], [1.0, 2.0], [-1.0, 1.0], [-1.0, 1.0]]);
    }

    #[test]
    fn invalid_polygon_is_skipped() {
        let mut r = renderer();
        let bow_tie = poly(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(r.draw_polygon(&bow_tie, Color::WHITE).is_ok());
        assert!(r.draw_polygon_outline(&bow_tie, 1.0, Color::WHITE).is_ok());
        assert_eq!(r.pending_quads(), 0);
    }

    #[test]
    fn outline_emits_one_line_per_edge() {
        let mut r = renderer();
        let square = poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        r.draw_polygon_outline(&square, 0.1, Color::WHITE).unwrap();
        assert_eq!(r.pending_quads(), 4);
    }

    // ── draw_string ───────────────────────────────────────────────────────

    #[test]
    fn newline_resets_x_and_drops_one_line() {
        let mut r = renderer();
        let font = font();
        let scale = 32.0;
        r.draw_string("A\nB", Vec2::new(10.0, 100.0), &font, Color::WHITE, scale).unwrap();

        assert_eq!(r.pending_quads(), 2);
        let a = r.queue.quads()[0].vertices[0].pos;
        let b = r.queue.quads()[1].vertices[0].pos;

        // factor = 32 / 16 = 2; bearing.x = 1 → x = 10 + 2.
        assert_eq!(a[0], 12.0);
        assert_eq!(b[0], a[0]);
        assert_eq!(a[1] - b[1], scale);
    }

    #[test]
    fn glyphs_advance_the_pen_and_use_the_font_texture() {
        let mut r = renderer();
        let font = font();
        r.draw_string("AB", Vec2::new(0.0, 0.0), &font, Color::WHITE, 16.0).unwrap();

        let a = &r.queue.quads()[0];
        let b = &r.queue.quads()[1];
        assert_eq!(b.vertices[0].pos[0] - a.vertices[0].pos[0], 8.0);
        assert_eq!(a.texture, font.texture());
        // Baseline at -16; bitmap bottom sits (size.y - bearing.y) below it.
        assert_eq!(a.vertices[0].pos[1], -18.0);
        assert_eq!(a.vertices[2].pos[1], -8.0);
    }

    #[test]
    fn unknown_glyphs_are_skipped() {
        let mut r = renderer();
        r.draw_string("A?B", Vec2::zero(), &font(), Color::WHITE, 16.0).unwrap();
        assert_eq!(r.pending_quads(), 2);
    }

    #[test]
    fn unloaded_font_is_a_no_op() {
        let mut r = renderer();
        let unloaded = Font::from_glyphs(Texture::default(), 16.0, HashMap::new());
        assert!(r.draw_string("A", Vec2::zero(), &unloaded, Color::WHITE, 16.0).is_ok());
        assert_eq!(r.pending_quads(), 0);
    }

    #[test]
    fn draw_text_uses_default_font() {
        let mut r = renderer();
        assert!(r.draw_text("A", Vec2::zero(), Color::WHITE, 16.0).is_ok());
        assert_eq!(r.pending_quads(), 0);

        r.set_default_font(font());
        r.draw_text("AB", Vec2::zero(), Color::WHITE, 16.0).unwrap();
        assert_eq!(r.pending_quads(), 2);
        assert!(r.default_font().is_some());
    }

    // ── draw_shadows ──────────────────────────────────────────────────────

    #[test]
    fn shadows_emit_one_quad_per_lit_edge() {
        let mut r = renderer();
        let square = poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let light = LightSource { position: Vec2::new(10.0, 0.5), ..LightSource::default() };
        r.draw_shadows(&light, &square, Color::BLACK).unwrap();
        assert_eq!(r.pending_quads(), 1);
    }
}
