/// Viewport size in physical pixels.
///
/// Signed on purpose: a negative window size reported by the platform is
/// carried through and rejected at flush time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.width < 0 || self.height < 0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}
