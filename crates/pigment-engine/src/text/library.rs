use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::error::LoadError;

use super::{GlyphMetrics, GlyphRasterizer, RasterGlyph};

/// Font library context.
///
/// Owns every parsed font face. Create one at startup, pass it to each
/// `Scene::load_font*` call, drop it at shutdown. Faces are cached by content so
/// rebuilding an atlas after a display-scale change does not parse the font again.
pub struct FontLibrary {
    collection_index: u32,
    faces: HashMap<u64, Vec<CachedFace>>,
}

/// A parsed face plus the exact source it came from. The digest only picks the bucket;
/// a hit requires identical bytes and collection index.
struct CachedFace {
    source: Box<[u8]>,
    collection_index: u32,
    font: fontdue::Font,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self { collection_index: 0, faces: HashMap::new() }
    }

    /// Selects which face to open from TrueType/OpenType collections.
    pub fn with_collection_index(mut self, index: u32) -> Self {
        self.collection_index = index;
        self
    }

    /// Number of distinct faces parsed so far.
    pub fn face_count(&self) -> usize {
        self.faces.values().map(Vec::len).sum()
    }

    /// Opens (or reuses) the face in `bytes` for rasterizing at `size_px`.
    pub fn face(&mut self, bytes: &[u8], size_px: u32) -> Result<FontFace<'_>, LoadError> {
        let mut hasher = DefaultHasher::new();
        bytes.len().hash(&mut hasher);
        bytes.hash(&mut hasher);
        self.collection_index.hash(&mut hasher);
        self.face_in_bucket(hasher.finish(), bytes, size_px)
    }

    fn face_in_bucket(&mut self, key: u64, bytes: &[u8], size_px: u32) -> Result<FontFace<'_>, LoadError> {
        let index = self.collection_index;
        let cached = self.faces.get(&key).and_then(|bucket| {
            bucket.iter().position(|f| f.collection_index == index && *f.source == *bytes)
        });

        let pos = match cached {
            Some(pos) => pos,
            None => {
                let settings = fontdue::FontSettings {
                    collection_index: index,
                    scale: size_px as f32,
                    ..fontdue::FontSettings::default()
                };
                let font = fontdue::Font::from_bytes(bytes, settings)
                    .map_err(|err| LoadError::Font(err.to_string()))?;
                log::debug!(
                    "opened font face {:?} ({} glyphs)",
                    font.name().unwrap_or("<unnamed>"),
                    font.glyph_count()
                );
                let bucket = self.faces.entry(key).or_default();
                bucket.push(CachedFace { source: bytes.into(), collection_index: index, font });
                bucket.len() - 1
            }
        };

        let font = &self.faces[&key][pos].font;
        Ok(FontFace { font, size_px: size_px as f32 })
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed face bound to one pixel size.
pub struct FontFace<'a> {
    font: &'a fontdue::Font,
    size_px: f32,
}

impl FontFace<'_> {
    fn convert(m: &fontdue::Metrics) -> GlyphMetrics {
        GlyphMetrics {
            width: m.width as u32,
            height: m.height as u32,
            left: m.xmin,
            // fontdue reports the bitmap's bottom edge; the atlas wants its top.
            top: m.ymin + m.height as i32,
            advance: m.advance_width.round(),
        }
    }

    fn has_glyph(&self, c: char) -> bool {
        self.font.lookup_glyph_index(c) != 0
    }
}

impl GlyphRasterizer for FontFace<'_> {
    fn metrics(&self, c: char) -> Option<GlyphMetrics> {
        self.has_glyph(c).then(|| Self::convert(&self.font.metrics(c, self.size_px)))
    }

    fn rasterize(&self, c: char) -> Option<RasterGlyph> {
        if !self.has_glyph(c) {
            return None;
        }
        let (metrics, coverage) = self.font.rasterize(c, self.size_px);
        Some(RasterGlyph { metrics: Self::convert(&metrics), coverage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{default_charset, FontAtlas};

    const SYSTEM_FONTS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    fn system_font() -> Option<Vec<u8>> {
        SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok())
    }

    #[test]
    fn garbage_is_a_font_error() {
        let mut library = FontLibrary::new();
        assert!(matches!(library.face(b"\0\0\0\0nope", 12), Err(LoadError::Font(_))));
        assert_eq!(library.face_count(), 0);
        assert!(library.faces.is_empty());
    }

    #[test]
    fn shared_digest_never_returns_another_font() {
        let Some(bytes) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        // Same face, different source bytes.
        let mut padded = bytes.clone();
        padded.extend_from_slice(&[0; 16]);

        let mut library = FontLibrary::new();
        library.face_in_bucket(7, &bytes, 16).unwrap();
        library.face_in_bucket(7, &padded, 16).unwrap();
        assert_eq!(library.face_count(), 2);
        assert_eq!(library.faces[&7].len(), 2);

        // Exact matches are still reused.
        library.face_in_bucket(7, &padded, 20).unwrap();
        library.face_in_bucket(7, &bytes, 20).unwrap();
        assert_eq!(library.face_count(), 2);
        assert_eq!(&*library.faces[&7][1].source, &padded[..]);
    }

    #[test]
    fn real_font_packs_printable_ascii() {
        let Some(bytes) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let mut library = FontLibrary::new();
        let face = library.face(&bytes, 24).unwrap();

        let space = face.metrics(' ').unwrap();
        assert!(space.advance > 0.0);
        let glyph = face.rasterize('R').unwrap();
        assert_eq!(glyph.coverage.len(), (glyph.metrics.width * glyph.metrics.height) as usize);
        assert!(glyph.metrics.top > 0);

        let atlas = FontAtlas::build(&face, 24, &default_charset(), 2048).unwrap();
        assert_eq!(atlas.glyph_count(), default_charset().len());
        let m = atlas.metrics();
        assert!(m.max_ascent > 0 && m.min_descent < 0);

        // The same bytes reuse the parsed face.
        library.face(&bytes, 32).unwrap();
        assert_eq!(library.face_count(), 1);
    }
}
