use super::Vec2;

/// Directed segment from `p1` to `p2`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Edge {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Edge {
    #[inline]
    pub const fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn direction(self) -> Vec2 {
        (self.p2 - self.p1).normalized()
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.p2 - self.p1).length()
    }

    /// Unit normal on the right-hand side of the edge.
    ///
    /// For a counter-clockwise polygon this points outward.
    #[inline]
    pub fn normal(self) -> Vec2 {
        self.direction().perp_right()
    }
}
