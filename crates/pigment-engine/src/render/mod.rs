//! GPU side of the scene: the vertex format, the render context and the one pipeline.
//!
//! Convention:
//! - vertices arrive in scene space (`x ∈ [-1, 1]`, +Y up)
//! - the vertex stage divides `y` by the `y_scale` uniform to reach NDC
//! - colors and image texels are premultiplied

mod ctx;
mod scene_renderer;
mod vertex;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
pub use vertex::{Vertex, NO_TEXTURE};
