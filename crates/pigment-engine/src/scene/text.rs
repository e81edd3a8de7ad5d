use std::path::Path;

use crate::coords::Vec2;
use crate::error::LoadError;
use crate::paint::Color;
use crate::render::Vertex;
use crate::text::{default_charset, FontAtlas, FontLibrary, FontMetrics, GlyphRasterizer};
use crate::texture::Channels;

use super::{LoadedFont, Scene};

/// Handle to a font loaded into a scene. Stable for the scene's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl Scene {
    // ── loading ───────────────────────────────────────────────────────────

    /// Reads a font file and packs `charset` (printable ASCII by default).
    ///
    /// Failures are logged and leave the scene untouched.
    pub fn load_font(
        &mut self,
        library: &mut FontLibrary,
        path: impl AsRef<Path>,
        size_px: u32,
        charset: Option<&[char]>,
    ) -> Result<FontId, LoadError> {
        let path = path.as_ref();
        std::fs::read(path)
            .map_err(|err| LoadError::io(path, err))
            .and_then(|bytes| self.load_font_from_memory(library, &bytes, size_px, charset))
            .inspect_err(|err| log::warn!("failed to load font {}: {err}", path.display()))
    }

    pub fn load_font_from_memory(
        &mut self,
        library: &mut FontLibrary,
        bytes: &[u8],
        size_px: u32,
        charset: Option<&[char]>,
    ) -> Result<FontId, LoadError> {
        let face = library
            .face(bytes, size_px)
            .inspect_err(|err| log::warn!("failed to open font face: {err}"))?;
        self.load_font_with(&face, size_px, charset)
    }

    /// Packs glyphs from any rasterizer into a new single-channel texture slot.
    ///
    /// # Panics
    /// If the glyphs overflow the atlas height bound or every texture slot is taken.
    pub fn load_font_with<R>(
        &mut self,
        raster: &R,
        size_px: u32,
        charset: Option<&[char]>,
    ) -> Result<FontId, LoadError>
    where
        R: GlyphRasterizer + ?Sized,
    {
        let default;
        let charset = match charset {
            Some(charset) => charset,
            None => {
                default = default_charset();
                &default
            }
        };

        let mut atlas = FontAtlas::build(raster, size_px, charset, self.config.max_texture_size)?;
        let (width, height) = atlas.dimensions();
        let slot = self.slots.allocate(Channels::Alpha, width, height, atlas.take_pixels());

        let id = FontId(self.fonts.len());
        log::info!(
            "font {} loaded: {} glyphs at {size_px}px, {width}x{height} atlas in slot {}",
            id.0,
            atlas.glyph_count(),
            slot.index()
        );
        self.fonts.push(LoadedFont { atlas, slot });
        Ok(id)
    }

    fn font(&self, id: FontId) -> Option<&LoadedFont> {
        let font = self.fonts.get(id.0);
        if font.is_none() {
            log::warn!("invalid font handle {}", id.0);
        }
        font
    }

    /// Vertical extents of the font's glyphs, in pixels.
    pub fn font_metrics(&self, id: FontId) -> Option<FontMetrics> {
        self.font(id).map(|f| f.atlas.metrics())
    }

    /// Nominal pixel size the font was loaded at.
    pub fn font_size(&self, id: FontId) -> Option<u32> {
        self.font(id).map(|f| f.atlas.size_px())
    }

    // ── layout ────────────────────────────────────────────────────────────

    /// Draws one glyph with its baseline origin at `pen`.
    ///
    /// Returns the glyph's advance in input units, or `0.0` if the font has no such
    /// glyph (nothing is drawn then).
    pub fn add_character(&mut self, font: FontId, pen: Vec2, c: char, color: Color) -> f32 {
        let Some(loaded) = self.font(font) else { return 0.0 };
        let Some(glyph) = loaded.atlas.glyph(c).copied() else { return 0.0 };
        let texture = loaded.slot.index() as u32;

        if glyph.width > 0 && glyph.height > 0 {
            let k = self.px();
            let (w, h) = (glyph.width as f32 * k, glyph.height as f32 * k);
            let origin = self.point(pen);
            // The atlas is bottom-up, so the quad starts at the bitmap's bottom edge.
            let x = origin.x + glyph.left as f32 * k;
            let y = origin.y + glyph.top as f32 * k - h;

            let [u0, v0] = glyph.uv_offset;
            let (u1, v1) = (u0 + glyph.uv_size[0], v0 + glyph.uv_size[1]);
            let rgba = color.to_array();
            let quad = [
                Vertex::textured(x, y, rgba, [u0, v0], texture),
                Vertex::textured(x + w, y, rgba, [u1, v0], texture),
                Vertex::textured(x + w, y + h, rgba, [u1, v1], texture),
                Vertex::textured(x + w, y + h, rgba, [u1, v1], texture),
                Vertex::textured(x, y + h, rgba, [u0, v1], texture),
                Vertex::textured(x, y, rgba, [u0, v0], texture),
            ];

            let out = self.reserve(quad.len());
            out[..quad.len()].copy_from_slice(&quad);
            self.commit(quad.len());
        }

        self.input_units(glyph.advance)
    }

    /// Lays out `text` starting with the baseline origin at `origin`.
    ///
    /// `'\n'` returns to `origin.x` and moves one line down. Codepoints the atlas
    /// lacks are skipped with the font's nominal size as their advance.
    pub fn add_text(&mut self, font: FontId, text: &str, origin: Vec2, color: Color) {
        let Some(loaded) = self.font(font) else { return };
        let size = loaded.atlas.size_px() as f32;
        let line = loaded.atlas.line_advance();

        // Lines go down the screen in both modes; input y only points down in pixels.
        let line_step = if self.config.use_screen_coords { line } else { -line * self.px() };
        let mut pen = origin;

        for c in text.chars() {
            if c == '\n' {
                pen = Vec2::new(origin.x, pen.y + line_step);
                continue;
            }
            let advance = self.add_character(font, pen, c, color);
            pen.x += if advance == 0.0 { self.input_units(size) } else { advance };
        }
    }

    /// Pen offset after laying out `text` with [`Scene::add_text`]'s advances.
    ///
    /// A newline resets the pen, so for multi-line text this is the width of the last
    /// line. See [`Scene::measure_text_block_width`] for the widest one.
    pub fn measure_text_width(&self, font: FontId, text: &str) -> f32 {
        let Some(loaded) = self.font(font) else { return 0.0 };

        let mut pen_x = 0.0;
        for c in text.chars() {
            if c == '\n' {
                pen_x = 0.0;
            } else {
                pen_x += self.input_units(loaded.atlas.advance(c));
            }
        }
        pen_x
    }

    /// Width of the widest line of `text`.
    pub fn measure_text_block_width(&self, font: FontId, text: &str) -> f32 {
        text.split('\n').map(|line| self.measure_text_width(font, line)).fold(0.0, f32::max)
    }
}
