use std::collections::HashMap;

use crate::error::LoadError;

use super::GlyphRasterizer;

/// Pixels left empty around every glyph so linear filtering never bleeds.
const GLYPH_PADDING: u32 = 1;

/// Printable ASCII, used when no charset is given.
pub fn default_charset() -> Vec<char> {
    (0x20u8..0x7f).map(char::from).collect()
}

/// One packed glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Bottom-left of the bitmap in the atlas, as a fraction of the atlas size.
    pub uv_offset: [f32; 2],
    /// Bitmap size as a fraction of the atlas size.
    pub uv_size: [f32; 2],
    /// Bitmap size in pixels.
    pub width: u32,
    pub height: u32,
    /// Horizontal distance from the pen to the bitmap's left edge.
    pub left: i32,
    /// Distance from the baseline up to the bitmap's top row.
    pub top: i32,
    pub advance: f32,
}

/// Vertical extents over every packed glyph, for caller-side centering.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FontMetrics {
    pub max_ascent: i32,
    pub min_descent: i32,
    pub max_height: i32,
}

/// Greyscale glyph atlas for one face at one pixel size.
///
/// Rows are stored bottom-up (row 0 is the bottom of the texture in scene space),
/// matching the renderer's +Y-up convention.
#[derive(Debug)]
pub struct FontAtlas {
    size_px: u32,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: HashMap<char, Glyph>,
    metrics: FontMetrics,
}

impl FontAtlas {
    /// Rasterizes and shelf-packs `charset` into a single-channel bitmap.
    ///
    /// The atlas is sized from the worst-case glyph cell: one shelf wide enough for
    /// the whole charset, capped at `max_texture_size`, and as many shelves as that
    /// cap forces.
    ///
    /// # Panics
    /// If the charset cannot fit inside `max_texture_size × max_texture_size`. There
    /// is no retry at a smaller size.
    pub fn build<R>(
        raster: &R,
        size_px: u32,
        charset: &[char],
        max_texture_size: u32,
    ) -> Result<Self, LoadError>
    where
        R: GlyphRasterizer + ?Sized,
    {
        if charset.is_empty() {
            return Err(LoadError::EmptyCharset);
        }

        let (cell_w, cell_h) = charset
            .iter()
            .filter_map(|&c| raster.metrics(c))
            .fold((1u32, 1u32), |(w, h), m| (w.max(m.width), h.max(m.height)));

        let limit = max_texture_size as u64;
        let pitch = (cell_w + GLYPH_PADDING) as u64;
        let mut total_width = pitch * charset.len() as u64 + GLYPH_PADDING as u64;
        total_width = total_width.next_multiple_of(4);
        let width = total_width.min(limit);

        if pitch + (GLYPH_PADDING as u64) > width {
            panic!(
                "font atlas: a {cell_w}px wide glyph cannot fit in a {max_texture_size}px texture"
            );
        }
        let per_row = (width - GLYPH_PADDING as u64) / pitch;
        let rows = (charset.len() as u64).div_ceil(per_row);
        let height = (rows * (cell_h + GLYPH_PADDING) as u64 + GLYPH_PADDING as u64).min(limit);

        let (width, height) = (width as u32, height as u32);
        log::debug!(
            "packing {} glyphs at {size_px}px into a {width}x{height} atlas ({rows} row{}), cell {cell_w}x{cell_h}",
            charset.len(),
            if rows > 1 { "s" } else { "" },
        );

        let mut atlas = FontAtlas {
            size_px,
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            glyphs: HashMap::with_capacity(charset.len()),
            metrics: FontMetrics::default(),
        };

        let mut extents: Option<FontMetrics> = None;
        let mut x = GLYPH_PADDING;
        let mut y = GLYPH_PADDING;
        let mut row_height = 0;

        for &c in charset {
            let Some(glyph) = raster.rasterize(c) else {
                log::warn!("font atlas: codepoint U+{:04X} not found in face", c as u32);
                continue;
            };
            let m = glyph.metrics;

            if x + m.width + GLYPH_PADDING > width {
                x = GLYPH_PADDING;
                y += row_height + GLYPH_PADDING;
                row_height = 0;
            }
            if y + m.height + GLYPH_PADDING > height {
                panic!(
                    "font atlas overflow: cannot fit {} glyphs at {size_px}px in {width}x{height} \
                     (texture limit {max_texture_size})",
                    charset.len()
                );
            }

            atlas.blit_flipped(x, y, m.width, m.height, &glyph.coverage);

            if m.height > 0 {
                let e = extents.get_or_insert(FontMetrics {
                    max_ascent: i32::MIN,
                    min_descent: i32::MAX,
                    max_height: 0,
                });
                e.max_ascent = e.max_ascent.max(m.top);
                e.min_descent = e.min_descent.min(m.top - m.height as i32);
                e.max_height = e.max_height.max(m.height as i32);
            }

            let (wf, hf) = (width as f32, height as f32);
            atlas.glyphs.insert(
                c,
                Glyph {
                    uv_offset: [x as f32 / wf, y as f32 / hf],
                    uv_size: [m.width as f32 / wf, m.height as f32 / hf],
                    width: m.width,
                    height: m.height,
                    left: m.left,
                    top: m.top,
                    advance: m.advance,
                },
            );

            x += m.width + GLYPH_PADDING;
            row_height = row_height.max(m.height);
        }

        atlas.metrics = extents.unwrap_or_default();
        Ok(atlas)
    }

    /// Copies top-down coverage rows into the atlas bottom-up.
    fn blit_flipped(&mut self, x: u32, y: u32, w: u32, h: u32, coverage: &[u8]) {
        let (w, h) = (w as usize, h as usize);
        for (r, src) in coverage.chunks_exact(w.max(1)).take(h).enumerate() {
            let dst_row = y as usize + (h - 1 - r);
            let start = dst_row * self.width as usize + x as usize;
            self.pixels[start..start + w].copy_from_slice(&src[..w]);
        }
    }

    #[inline]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    #[inline]
    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    #[inline]
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Hands the bitmap over to a texture slot, which keeps the CPU mirror from then on.
    pub(crate) fn take_pixels(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pixels)
    }

    /// Pen advance for `c`, falling back to the nominal size for missing or
    /// zero-width glyphs.
    #[inline]
    pub fn advance(&self, c: char) -> f32 {
        match self.glyphs.get(&c) {
            Some(g) if g.advance != 0.0 => g.advance,
            _ => self.size_px as f32,
        }
    }

    /// Distance between baselines.
    #[inline]
    pub fn line_advance(&self) -> f32 {
        self.size_px as f32 * 1.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::BoxFont;

    fn pixel_rect(atlas: &FontAtlas, g: &Glyph) -> (u32, u32, u32, u32) {
        let (w, h) = atlas.dimensions();
        let x = (g.uv_offset[0] * w as f32).round() as u32;
        let y = (g.uv_offset[1] * h as f32).round() as u32;
        (x, y, g.width, g.height)
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn every_charset_glyph_is_retrievable_with_normalized_uv() {
        let charset = default_charset();
        let atlas = FontAtlas::build(&BoxFont::new(5, 8), 16, &charset, 4096).unwrap();

        assert_eq!(atlas.glyph_count(), charset.len());
        for c in charset {
            let g = atlas.glyph(c).unwrap();
            for v in [g.uv_offset[0], g.uv_offset[1]] {
                assert!((0.0..=1.0).contains(&v));
            }
            assert!(g.uv_offset[0] + g.uv_size[0] <= 1.0);
            assert!(g.uv_offset[1] + g.uv_size[1] <= 1.0);
        }
        assert!(atlas.glyph('é').is_none());
        assert!(atlas.glyph('\u{7f}').is_none());
    }

    #[test]
    fn missing_codepoints_are_skipped() {
        let mut font = BoxFont::new(4, 4);
        font.missing.push('b');
        let atlas = FontAtlas::build(&font, 12, &['a', 'b', 'c'], 1024).unwrap();
        assert!(atlas.glyph('a').is_some());
        assert!(atlas.glyph('b').is_none());
        assert!(atlas.glyph('c').is_some());
    }

    #[test]
    fn empty_charset_is_an_error() {
        let err = FontAtlas::build(&BoxFont::new(4, 4), 12, &[], 1024).unwrap_err();
        assert!(matches!(err, LoadError::EmptyCharset));
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn glyphs_never_overlap_and_wrap_rows() {
        let charset: Vec<char> = ('a'..='t').collect();
        // 40px wide fits six glyphs per shelf.
        let atlas = FontAtlas::build(&BoxFont::new(5, 6), 10, &charset, 40).unwrap();
        let (w, h) = atlas.dimensions();
        assert!(w <= 40 && h <= 40);

        let rects: Vec<_> = charset
            .iter()
            .map(|&c| pixel_rect(&atlas, atlas.glyph(c).unwrap()))
            .collect();
        assert!(rects.iter().any(|r| r.1 > 1), "expected more than one shelf");

        for (i, a) in rects.iter().enumerate() {
            assert!(a.0 + a.2 <= w && a.1 + a.3 <= h);
            for b in &rects[i + 1..] {
                let disjoint = a.0 + a.2 <= b.0 || b.0 + b.2 <= a.0 || a.1 + a.3 <= b.1 || b.1 + b.3 <= a.1;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "font atlas overflow")]
    fn overflowing_height_bound_is_fatal() {
        let charset = default_charset();
        FontAtlas::build(&BoxFont::new(6, 6), 10, &charset, 16).unwrap();
    }

    #[test]
    fn bitmap_is_stored_bottom_up() {
        let atlas = FontAtlas::build(&BoxFont::new(3, 4), 10, &['A'], 64).unwrap();
        let g = *atlas.glyph('A').unwrap();
        let (x, y, w, h) = pixel_rect(&atlas, &g);
        let stride = atlas.dimensions().0 as usize;
        let at = |col: u32, row: u32| atlas.pixels()[row as usize * stride + col as usize];

        // The rasterizer's top row lands on the highest atlas row of the glyph.
        for col in x..x + w {
            assert_eq!(at(col, y + h - 1), 255);
            assert_eq!(at(col, y), 7);
        }
    }

    // ── metrics ───────────────────────────────────────────────────────────

    #[test]
    fn extents_cover_all_glyphs() {
        let atlas = FontAtlas::build(&BoxFont::new(3, 10), 10, &['a', ' '], 64).unwrap();
        assert_eq!(
            atlas.metrics(),
            FontMetrics { max_ascent: 8, min_descent: -2, max_height: 10 }
        );
    }

    #[test]
    fn advance_falls_back_to_nominal_size() {
        let atlas = FontAtlas::build(&BoxFont::new(3, 3), 14, &['a'], 64).unwrap();
        assert_eq!(atlas.advance('a'), 9.0);
        assert_eq!(atlas.advance('z'), 14.0);
        assert!((atlas.line_advance() - 16.8).abs() < 1e-5);
    }
}
