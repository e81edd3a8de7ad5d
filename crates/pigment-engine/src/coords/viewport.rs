/// Viewport size in physical pixels.
///
/// The scene derives its aspect ratio from this each frame; see [`Viewport::y_scale`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Height over width.
    ///
    /// Scene space spans `x ∈ [-1, 1]` and `y ∈ [-y_scale, y_scale]`; the vertex shader
    /// divides `y` by this value to land in NDC.
    #[inline]
    pub fn y_scale(self) -> f32 {
        self.height / self.width
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width.max(1) as f32, size.height.max(1) as f32)
    }
}
