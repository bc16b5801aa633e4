use super::Vec2;

/// Axis-aligned rectangle in world units. `origin` is the bottom-left corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Corners in quad winding order:
    /// bottom-left, bottom-right, top-right, top-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }
}

/// Texture-coordinate rectangle `(u_min, v_min, u_max, v_max)`.
///
/// `(u_min, v_min)` is sampled at the bottom-left corner of the quad and
/// `(u_max, v_max)` at the top-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl UvRect {
    /// Whole texture, upright. Texture rows are stored top-down, so the
    /// bottom of the quad samples `v = 1`.
    pub const FULL: UvRect = UvRect::new(0.0, 1.0, 1.0, 0.0);

    #[inline]
    pub const fn new(u_min: f32, v_min: f32, u_max: f32, v_max: f32) -> Self {
        Self { u_min, v_min, u_max, v_max }
    }

    /// Texture coordinates matching [`Rect::corners`] order.
    #[inline]
    pub fn corners(self) -> [[f32; 2]; 4] {
        [
            [self.u_min, self.v_min],
            [self.u_max, self.v_min],
            [self.u_max, self.v_max],
            [self.u_min, self.v_max],
        ]
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}
