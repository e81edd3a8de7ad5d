use std::path::Path;
use std::str::FromStr;

use crate::error::LoadError;

/// Supported source formats.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageKind {
    Png,
    Svg,
}

impl ImageKind {
    /// Guesses the kind from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension()?.to_str()?.parse().ok()
    }
}

impl FromStr for ImageKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("png") {
            Ok(ImageKind::Png)
        } else if s.eq_ignore_ascii_case("svg") {
            Ok(ImageKind::Svg)
        } else {
            Err(LoadError::UnsupportedKind(s.to_owned()))
        }
    }
}

/// Premultiplied RGBA8 pixels, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes `bytes` to premultiplied RGBA8.
///
/// SVGs are rendered at their intrinsic size. Sources wider or taller than
/// `max_size` are rejected from their header before any pixel buffer is allocated.
pub fn decode(bytes: &[u8], kind: ImageKind, max_size: u32) -> Result<DecodedImage, LoadError> {
    let image = match kind {
        ImageKind::Png => decode_png(bytes, max_size)?,
        ImageKind::Svg => decode_svg(bytes, max_size)?,
    };
    log::debug!("decoded {kind:?} image {}x{}", image.width, image.height);
    Ok(image)
}

fn check_size(width: u32, height: u32, limit: u32) -> Result<(), LoadError> {
    if width > limit || height > limit {
        return Err(LoadError::TooLarge { width, height, limit });
    }
    Ok(())
}

fn decode_png(bytes: &[u8], max_size: u32) -> Result<DecodedImage, LoadError> {
    let (width, height) =
        image::ImageReader::with_format(std::io::Cursor::new(bytes), image::ImageFormat::Png)
            .into_dimensions()?;
    check_size(width, height, max_size)?;

    let rgba = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = rgba.into_raw();
    premultiply(&mut pixels);
    Ok(DecodedImage { width, height, pixels })
}

fn decode_svg(bytes: &[u8], max_size: u32) -> Result<DecodedImage, LoadError> {
    use resvg::{tiny_skia, usvg};

    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size().to_int_size();
    check_size(size.width(), size.height(), max_size)?;
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(LoadError::EmptySvg)?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia already stores premultiplied RGBA8.
    Ok(DecodedImage { width: size.width(), height: size.height(), pixels: pixmap.take() })
}

fn premultiply(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}
