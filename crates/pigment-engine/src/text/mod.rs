//! Font atlas: glyph rasterization and shelf packing into one greyscale texture.

mod atlas;
mod library;

pub use atlas::{default_charset, FontAtlas, FontMetrics, Glyph};
pub use library::{FontFace, FontLibrary};

/// Metrics of one glyph at the rasterizer's pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub advance: f32,
}

/// A rasterized glyph: `width × height` coverage bytes, top row first.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub metrics: GlyphMetrics,
    pub coverage: Vec<u8>,
}

/// Source of glyph bitmaps for [`FontAtlas::build`].
pub trait GlyphRasterizer {
    /// Metrics without rasterizing; `None` if the face has no glyph for `c`.
    fn metrics(&self, c: char) -> Option<GlyphMetrics>;

    /// Rasterizes `c`; `None` if the face has no glyph for it.
    fn rasterize(&self, c: char) -> Option<RasterGlyph>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{GlyphMetrics, GlyphRasterizer, RasterGlyph};

    /// Every glyph is a solid box; the top row is 255, the rest 7. Space is empty.
    pub(crate) struct BoxFont {
        pub w: u32,
        pub h: u32,
        pub advance: f32,
        pub missing: Vec<char>,
    }

    impl BoxFont {
        pub(crate) fn new(w: u32, h: u32) -> Self {
            Self { w, h, advance: 9.0, missing: Vec::new() }
        }
    }

    impl GlyphRasterizer for BoxFont {
        fn metrics(&self, c: char) -> Option<GlyphMetrics> {
            if self.missing.contains(&c) {
                return None;
            }
            let (w, h) = if c == ' ' { (0, 0) } else { (self.w, self.h) };
            Some(GlyphMetrics { width: w, height: h, left: 1, top: h as i32 - 2, advance: self.advance })
        }

        fn rasterize(&self, c: char) -> Option<RasterGlyph> {
            let metrics = self.metrics(c)?;
            let mut coverage = vec![7u8; (metrics.width * metrics.height) as usize];
            coverage[..metrics.width as usize].fill(255);
            Some(RasterGlyph { metrics, coverage })
        }
    }
}
