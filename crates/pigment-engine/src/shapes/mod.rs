//! Shape generators and tessellators.
//!
//! Generators produce ordered outlines; tessellators turn them into triangle lists
//! without leaving the scene's vertex buffer.

mod generate;
mod rounded_quad;
mod tessellate;

pub use generate::{circle, circle_arc, quad, rectangle, signed_area, superellipse};
pub use rounded_quad::{rounded_quad, rounded_quad_point_count, RoundedCorners};
pub use tessellate::{edge_count, edge_quad, outlineize, triangleize, FILL_STRIDE, STROKE_STRIDE};
