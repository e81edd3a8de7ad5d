//! Paint types.
//!
//! Only solid vertex colors exist; images and glyphs modulate them in the fragment stage.

mod color;

pub use color::Color;
