//! Texture slots: the CPU side of every texture the scene samples from.
//!
//! Each slot keeps an owned mirror of its pixels so atlases can grow without reading
//! back from the GPU. The renderer compares [`TextureSlot::generation`] against what it
//! last uploaded and re-uploads (or recreates) the GPU texture when they differ.

/// Upper bound on texture slots, and the number of texture bindings in the shader.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Stable index of a texture slot. Never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SlotId(pub(crate) u32);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pixel layout of a slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Channels {
    /// Single coverage channel (glyph atlases).
    Alpha,
    /// Premultiplied RGBA8 (image atlases).
    Rgba,
}

impl Channels {
    #[inline]
    pub const fn count(self) -> u32 {
        match self {
            Channels::Alpha => 1,
            Channels::Rgba => 4,
        }
    }

    #[inline]
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            Channels::Alpha => wgpu::TextureFormat::R8Unorm,
            Channels::Rgba => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

#[derive(Debug)]
pub struct TextureSlot {
    channels: Channels,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    generation: u64,
}

impl TextureSlot {
    fn new(channels: Channels, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * channels.count() as usize,
            "texture slot pixel buffer does not match {width}x{height}x{}",
            channels.count()
        );
        Self { channels, width, height, pixels, generation: 0 }
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bumped on every CPU-side change.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn row_bytes(&self, width: u32) -> usize {
        width as usize * self.channels.count() as usize
    }

    /// Enlarges the slot, keeping every existing row at the same pixel position.
    pub fn grow(&mut self, width: u32, height: u32) {
        debug_assert!(width >= self.width && height >= self.height, "slots only grow");
        if width == self.width && height == self.height {
            return;
        }

        let old_row = self.row_bytes(self.width);
        let new_row = self.row_bytes(width);
        let mut pixels = vec![0u8; new_row * height as usize];
        for (dst, src) in pixels.chunks_exact_mut(new_row).zip(self.pixels.chunks_exact(old_row)) {
            dst[..old_row].copy_from_slice(src);
        }

        log::debug!(
            "texture slot grown {}x{} -> {width}x{height}",
            self.width,
            self.height
        );
        self.pixels = pixels;
        self.width = width;
        self.height = height;
        self.generation += 1;
    }

    /// Copies a top-down `w × h` block so that its first row lands at `y + h - 1`.
    pub fn write_flipped(&mut self, x: u32, y: u32, w: u32, h: u32, data: &[u8]) {
        assert!(x + w <= self.width && y + h <= self.height, "write outside texture slot");
        let src_row = self.row_bytes(w);
        let dst_row = self.row_bytes(self.width);
        let x_off = self.row_bytes(x);

        for (r, src) in data.chunks_exact(src_row.max(1)).take(h as usize).enumerate() {
            let row = (y + h - 1) as usize - r;
            let start = row * dst_row + x_off;
            self.pixels[start..start + src_row].copy_from_slice(src);
        }
        self.generation += 1;
    }
}

/// Grow-only arena of texture slots.
#[derive(Debug, Default)]
pub struct SlotTable {
    slots: Vec<TextureSlot>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new slot.
    ///
    /// # Panics
    /// When all [`MAX_TEXTURE_SLOTS`] slots are taken.
    pub fn allocate(&mut self, channels: Channels, width: u32, height: u32, pixels: Vec<u8>) -> SlotId {
        if self.slots.len() >= MAX_TEXTURE_SLOTS {
            panic!("texture slots exhausted: at most {MAX_TEXTURE_SLOTS} textures per scene");
        }
        let id = SlotId(self.slots.len() as u32);
        self.slots.push(TextureSlot::new(channels, width, height, pixels));
        log::debug!("allocated texture slot {} ({channels:?}, {width}x{height})", id.0);
        id
    }

    /// Allocates a zero-filled slot.
    pub fn allocate_blank(&mut self, channels: Channels, width: u32, height: u32) -> SlotId {
        let len = width as usize * height as usize * channels.count() as usize;
        self.allocate(channels, width, height, vec![0; len])
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> &TextureSlot {
        &self.slots[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> &mut TextureSlot {
        &mut self.slots[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureSlot> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut table = SlotTable::new();
        let a = table.allocate_blank(Channels::Alpha, 4, 4);
        let b = table.allocate_blank(Channels::Rgba, 2, 2);
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(table.get(b).pixels().len(), 16);
    }

    #[test]
    #[should_panic(expected = "texture slots exhausted")]
    fn ninth_slot_is_fatal() {
        let mut table = SlotTable::new();
        for _ in 0..=MAX_TEXTURE_SLOTS {
            table.allocate_blank(Channels::Alpha, 1, 1);
        }
    }

    #[test]
    fn grow_preserves_rows() {
        let mut table = SlotTable::new();
        let id = table.allocate(Channels::Alpha, 2, 2, vec![1, 2, 3, 4]);
        let slot = table.get_mut(id);
        slot.grow(3, 3);
        assert_eq!(slot.pixels(), &[1, 2, 0, 3, 4, 0, 0, 0, 0]);
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn write_flipped_puts_first_row_on_top() {
        let mut table = SlotTable::new();
        let id = table.allocate_blank(Channels::Rgba, 2, 3);
        let slot = table.get_mut(id);
        let top = [9u8; 4];
        let bottom = [5u8; 4];
        let data: Vec<u8> = top.iter().chain(bottom.iter()).copied().collect();
        slot.write_flipped(1, 1, 1, 2, &data);

        let px = |x: usize, y: usize| &slot.pixels()[(y * 2 + x) * 4..(y * 2 + x) * 4 + 4];
        assert_eq!(px(1, 2), &top);
        assert_eq!(px(1, 1), &bottom);
        assert_eq!(px(0, 1), &[0; 4]);
    }
}
