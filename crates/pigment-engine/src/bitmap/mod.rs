//! Image atlas: PNG and SVG decoding plus online packing into RGBA texture slots.

mod atlas;
mod decode;

pub use atlas::{Bitmap, ImageAtlas, ImageId, PixelRect, INITIAL_ATLAS_SIZE};
pub use decode::{decode, DecodedImage, ImageKind};

#[cfg(test)]
pub(crate) use decode::tests as decode_fixtures;
