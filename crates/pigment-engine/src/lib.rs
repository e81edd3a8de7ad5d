//! Pigment engine.
//!
//! A batched 2-D renderer: shapes, text and images accumulate into one vertex buffer
//! per frame and reach the GPU in a single draw call.
//!
//! - [`scene::Scene`] collects geometry through its `add_*` calls
//! - [`render::SceneRenderer`] uploads and draws it with wgpu
//! - [`text`] and [`bitmap`] pack glyphs and images into the scene's texture slots

pub mod bitmap;
pub mod coords;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod texture;

pub use error::LoadError;
