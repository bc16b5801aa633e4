use std::collections::HashMap;

use crate::coords::{UvRect, Vec2};

use super::{RenderError, Texture};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_WIDTH: u32 = 512;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas
const FIRST_CHAR: char = ' ';
const LAST_CHAR: char = '~';

/// Metrics of one glyph at the font's native size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Offset from the pen position to the bitmap's left edge (`x`) and from
    /// the baseline up to the bitmap's top edge (`y`).
    pub bearing: Vec2,
    /// Bitmap size in pixels.
    pub size: Vec2,
    /// Horizontal pen advance in pixels.
    pub advance: f32,
    pub uv: UvRect,
}

/// Bitmap font: a texture atlas plus per-character metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    texture: Texture,
    size: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Assembles a font from an already-uploaded atlas.
    pub fn from_glyphs(texture: Texture, size: f32, glyphs: HashMap<char, Glyph>) -> Self {
        Self { texture, size, glyphs }
    }

    #[inline]
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Pixel size the atlas was rasterized at.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.texture.is_valid()
    }
}

/// CPU side of a rasterized font, ready for upload.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pub width: u32,
    pub height: u32,
    /// Premultiplied white RGBA; coverage lands in every channel.
    pub pixels: Vec<u8>,
    pub glyphs: HashMap<char, Glyph>,
}

struct Placed {
    c: char,
    metrics: fontdue::Metrics,
    coverage: Vec<u8>,
    x: u32,
    y: u32,
}

/// Rasterizes printable ASCII from a TrueType/OpenType font at `size` pixels.
pub fn rasterize_ascii(bytes: &[u8], size: f32) -> Result<FontAtlas, RenderError> {
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| RenderError::FontLoad(e.to_string()))?;

    // Shelf packing: fill rows left to right, open a new row when full.
    let mut placed = Vec::new();
    let mut cursor_x = GLYPH_PADDING;
    let mut cursor_y = GLYPH_PADDING;
    let mut row_height = 0;

    for c in FIRST_CHAR..=LAST_CHAR {
        let (metrics, coverage) = font.rasterize(c, size);
        let w = metrics.width as u32;
        let h = metrics.height as u32;

        if w + 2 * GLYPH_PADDING > ATLAS_WIDTH {
            return Err(RenderError::FontLoad(format!(
                "glyph '{c}' is wider than the {ATLAS_WIDTH}px atlas at {size}px"
            )));
        }

        if cursor_x + w + GLYPH_PADDING > ATLAS_WIDTH {
            cursor_y += row_height + GLYPH_PADDING;
            cursor_x = GLYPH_PADDING;
            row_height = 0;
        }

        placed.push(Placed { c, metrics, coverage, x: cursor_x, y: cursor_y });

        cursor_x += w + GLYPH_PADDING;
        row_height = row_height.max(h);
    }

    let height = (cursor_y + row_height + GLYPH_PADDING).next_power_of_two();
    let mut pixels = vec![0u8; (ATLAS_WIDTH * height * 4) as usize];
    let mut glyphs = HashMap::with_capacity(placed.len());

    let atlas_w = ATLAS_WIDTH as f32;
    let atlas_h = height as f32;

    for p in placed {
        let w = p.metrics.width as u32;
        let h = p.metrics.height as u32;

        for row in 0..h {
            for col in 0..w {
                let a = p.coverage[(row * w + col) as usize];
                let dst = (((p.y + row) * ATLAS_WIDTH + p.x + col) * 4) as usize;
                pixels[dst..dst + 4].copy_from_slice(&[a, a, a, a]);
            }
        }

        // Bottom of the quad samples the bitmap's last row.
        let uv = UvRect::new(
            p.x as f32 / atlas_w,
            (p.y + h) as f32 / atlas_h,
            (p.x + w) as f32 / atlas_w,
            p.y as f32 / atlas_h,
        );

        glyphs.insert(p.c, Glyph {
            bearing: Vec2::new(p.metrics.xmin as f32, (p.metrics.ymin + p.metrics.height as i32) as f32),
            size: Vec2::new(w as f32, h as f32),
            advance: p.metrics.advance_width,
            uv,
        });
    }

    log::debug!(
        "rasterized {} glyphs at {size}px into a {ATLAS_WIDTH}x{height} atlas",
        glyphs.len()
    );

    Ok(FontAtlas {
        width: ATLAS_WIDTH,
        height,
        pixels,
        glyphs,
    })
}
