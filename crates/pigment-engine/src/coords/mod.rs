//! Coordinate types shared by the generators, the scene and the renderer.
//!
//! Two spaces are in play:
//! - input space: physical pixels, origin top-left, +Y down (screen-coordinate mode)
//! - scene space: `x ∈ [-1, 1]`, `y ∈ [-y_scale, y_scale]`, +Y up
//!
//! Scene space is a uniform scaling of NDC, so circles generated there stay circular
//! once the vertex shader divides `y` by `y_scale`.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
