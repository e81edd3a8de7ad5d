use crate::error::LoadError;
use crate::texture::{Channels, SlotId, SlotTable};

use super::DecodedImage;

/// Side length a fresh image slot starts at (clamped to the texture limit).
pub const INITIAL_ATLAS_SIZE: u32 = 256;

/// Handle to a packed image. Indexes the atlas's bitmap list.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId(pub(crate) usize);

/// Pixel rectangle inside a texture slot, `y` counted from the bottom row.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Normalized `(offset, size)` for a slot of the given size.
    pub fn uv(&self, slot_width: u32, slot_height: u32) -> ([f32; 2], [f32; 2]) {
        let (w, h) = (slot_width as f32, slot_height as f32);
        (
            [self.x as f32 / w, self.y as f32 / h],
            [self.width as f32 / w, self.height as f32 / h],
        )
    }
}

/// Where an image was placed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Bitmap {
    pub slot: SlotId,
    pub rect: PixelRect,
}

#[derive(Debug, Copy, Clone)]
struct Cursor {
    slot: SlotId,
    pen_x: u32,
    pen_y: u32,
    row_height: u32,
}

/// Online shelf packer over RGBA texture slots.
///
/// Images are appended to the current shelf of the active slot. When a shelf runs
/// out the slot widens, then wraps to a new shelf, then grows taller; once the texture
/// limit stops all of that a new slot is opened. Growing never moves a placed image,
/// so earlier handles stay valid (their UVs are taken against the slot's size at the
/// time they are drawn).
#[derive(Debug, Default)]
pub struct ImageAtlas {
    cursor: Option<Cursor>,
    bitmaps: Vec<Bitmap>,
}

impl ImageAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: ImageId) -> Option<&Bitmap> {
        self.bitmaps.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Packs `image` and copies its pixels (flipped) into the chosen slot.
    ///
    /// Images wider or taller than `max_texture_size` are rejected without touching
    /// any state.
    ///
    /// # Panics
    /// If a new slot is needed and every texture slot is already taken.
    pub fn insert(
        &mut self,
        slots: &mut SlotTable,
        image: &DecodedImage,
        max_texture_size: u32,
    ) -> Result<ImageId, LoadError> {
        let (w, h) = (image.width, image.height);
        if w > max_texture_size || h > max_texture_size {
            return Err(LoadError::TooLarge { width: w, height: h, limit: max_texture_size });
        }

        let cursor = match self.cursor {
            Some(cursor) => self.place(slots, cursor, w, h, max_texture_size),
            None => None,
        };
        let mut cursor = cursor.unwrap_or_else(|| {
            let side = INITIAL_ATLAS_SIZE.min(max_texture_size);
            let slot = slots.allocate_blank(Channels::Rgba, side.max(w), side.max(h));
            Cursor { slot, pen_x: 0, pen_y: 0, row_height: 0 }
        });

        let rect = PixelRect { x: cursor.pen_x, y: cursor.pen_y, width: w, height: h };
        slots.get_mut(cursor.slot).write_flipped(rect.x, rect.y, w, h, &image.pixels);

        cursor.pen_x += w;
        cursor.row_height = cursor.row_height.max(h);
        self.cursor = Some(cursor);

        let id = ImageId(self.bitmaps.len());
        self.bitmaps.push(Bitmap { slot: cursor.slot, rect });
        log::debug!(
            "image {} ({w}x{h}) packed into slot {} at ({}, {})",
            id.0,
            cursor.slot.index(),
            rect.x,
            rect.y
        );
        Ok(id)
    }

    /// Finds room for a `w × h` image in the active slot, growing it if needed.
    /// `None` means the slot is full and a new one must be opened.
    fn place(
        &self,
        slots: &mut SlotTable,
        mut cursor: Cursor,
        w: u32,
        h: u32,
        limit: u32,
    ) -> Option<Cursor> {
        let slot = slots.get(cursor.slot);
        let (mut width, mut height) = (slot.width(), slot.height());

        if cursor.pen_x + w > width {
            match grown(width, cursor.pen_x + w, limit) {
                Some(new_width) => width = new_width,
                None => {
                    cursor.pen_x = 0;
                    cursor.pen_y += cursor.row_height;
                    cursor.row_height = 0;
                    if w > width {
                        width = grown(width, w, limit)?;
                    }
                }
            }
        }

        if cursor.pen_y + h > height {
            height = grown(height, cursor.pen_y + h, limit)?;
        }

        slots.get_mut(cursor.slot).grow(width, height);
        Some(cursor)
    }
}

/// Doubles `current` until it covers `needed`, capped at `limit`.
fn grown(current: u32, needed: u32, limit: u32) -> Option<u32> {
    if needed > limit {
        return None;
    }
    Some(current.saturating_mul(2).max(needed).min(limit))
}
