use std::path::Path;

use crate::bitmap::{decode, ImageId, ImageKind};
use crate::coords::Vec2;
use crate::error::LoadError;
use crate::paint::Color;
use crate::render::Vertex;

use super::Scene;

impl Scene {
    /// Reads and packs an image file. `kind` defaults to the file extension.
    pub fn load_image(
        &mut self,
        path: impl AsRef<Path>,
        kind: Option<ImageKind>,
    ) -> Result<ImageId, LoadError> {
        let path = path.as_ref();
        let kind = match kind.or_else(|| ImageKind::from_path(path)) {
            Some(kind) => kind,
            None => {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
                let err = LoadError::UnsupportedKind(ext.to_owned());
                log::warn!("failed to load image {}: {err}", path.display());
                return Err(err);
            }
        };

        std::fs::read(path)
            .map_err(|err| LoadError::io(path, err))
            .and_then(|bytes| self.load_image_from_memory(&bytes, kind))
            .inspect_err(|err| log::warn!("failed to load image {}: {err}", path.display()))
    }

    /// Decodes and packs an image into the shared RGBA atlas.
    ///
    /// # Panics
    /// If the image needs a new texture slot and all of them are taken.
    pub fn load_image_from_memory(&mut self, bytes: &[u8], kind: ImageKind) -> Result<ImageId, LoadError> {
        let image = decode(bytes, kind, self.config.max_texture_size)
            .inspect_err(|err| log::warn!("failed to decode {kind:?} image: {err}"))?;
        self.images.insert(&mut self.slots, &image, self.config.max_texture_size)
    }

    /// Pixel size of a packed image.
    pub fn image_size(&self, id: ImageId) -> Option<(u32, u32)> {
        self.images.get(id).map(|b| (b.rect.width, b.rect.height))
    }

    /// Draws an image at its pixel size with its top-left corner at `origin`.
    pub fn add_image(&mut self, id: ImageId, origin: Vec2) {
        let Some((w, h)) = self.image_size(id) else {
            log::warn!("invalid image handle {}", id.0);
            return;
        };
        let size = Vec2::new(self.input_units(w as f32), self.input_units(h as f32));
        self.add_image_sized(id, origin, size, Color::white());
    }

    /// Draws an image stretched to `size` (input units), multiplied by `tint`.
    pub fn add_image_sized(&mut self, id: ImageId, origin: Vec2, size: Vec2, tint: Color) {
        let Some(bitmap) = self.images.get(id).copied() else {
            log::warn!("invalid image handle {}", id.0);
            return;
        };
        let slot = self.slots.get(bitmap.slot);
        // UVs are taken against the slot's current size, which may have grown since.
        let ([u0, v0], [du, dv]) = bitmap.rect.uv(slot.width(), slot.height());
        let (u1, v1) = (u0 + du, v0 + dv);
        let texture = bitmap.slot.index() as u32;

        // In pixels +Y points down, in scene units up; either way the image hangs below origin.
        let top_left = self.point(origin);
        let extent = self.size(size);
        let (w, h) = if self.config.use_screen_coords { (extent.x, -extent.y) } else { (extent.x, extent.y) };
        let (x, y) = (top_left.x, top_left.y - h);

        let rgba = tint.to_array();
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::decode_fixtures::{png_bytes, HUGE_SVG, RED_SQUARE_SVG};
    use crate::coords::Viewport;
    use crate::scene::tests::screen_scene;
    use crate::scene::SceneConfig;
    use crate::texture::Channels;

    #[test]
    fn png_and_svg_share_one_rgba_slot() {
        let mut scene = screen_scene(100);
        let png = png_bytes(2, 2, &[255; 16]);
        let a = scene.load_image_from_memory(&png, ImageKind::Png).unwrap();
        let b = scene.load_image_from_memory(RED_SQUARE_SVG.as_bytes(), ImageKind::Svg).unwrap();

        assert_ne!(a, b);
        assert_eq!(scene.slots().len(), 1);
        assert_eq!(scene.slots().iter().next().unwrap().channels(), Channels::Rgba);
        assert_eq!(scene.image_size(a), Some((2, 2)));
        assert_eq!(scene.image_size(b), Some((6, 4)));
    }

    #[test]
    fn failed_loads_leave_state_untouched() {
        let mut scene = screen_scene(100);
        assert!(scene.load_image_from_memory(b"garbage", ImageKind::Png).is_err());
        assert!(scene.load_image("/nonexistent/icon.svg", None).is_err());
        assert!(matches!(scene.load_image("notes.txt", None), Err(LoadError::UnsupportedKind(_))));

        let config = SceneConfig { max_texture_size: 4, ..SceneConfig::default() };
        let mut small = Scene::new(config, Viewport::new(100.0, 100.0));
        let err = small.load_image_from_memory(RED_SQUARE_SVG.as_bytes(), ImageKind::Svg);
        assert!(matches!(err, Err(LoadError::TooLarge { .. })));

        assert!(scene.slots().is_empty() && small.slots().is_empty());
    }

    #[test]
    fn failed_loads_keep_packed_images_and_geometry() {
        let mut scene = screen_scene(100);
        let id = scene.load_image_from_memory(RED_SQUARE_SVG.as_bytes(), ImageKind::Svg).unwrap();
        scene.add_image(id, Vec2::new(10.0, 10.0));
        scene.add_rectangle(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Color::white());

        let bitmap = *scene.images.get(id).unwrap();
        let slot = scene.slots().get(bitmap.slot);
        let (slot_size, generation) = ((slot.width(), slot.height()), slot.generation());
        let pixels = slot.pixels().to_vec();
        let len = scene.len();

        assert!(matches!(
            scene.load_image_from_memory(HUGE_SVG.as_bytes(), ImageKind::Svg),
            Err(LoadError::TooLarge { .. })
        ));
        assert!(scene.load_image_from_memory(b"garbage", ImageKind::Png).is_err());
        assert!(scene.load_image_from_memory(b"<svg", ImageKind::Svg).is_err());
        assert!(scene.load_image("/nonexistent/icon.png", None).is_err());

        assert_eq!(scene.slots().len(), 1);
        assert_eq!(scene.images.get(id), Some(&bitmap));
        assert_eq!(scene.image_size(id), Some((6, 4)));
        assert_eq!(scene.len(), len);
        let slot = scene.slots().get(bitmap.slot);
        assert_eq!((slot.width(), slot.height()), slot_size);
        assert_eq!(slot.generation(), generation);
        assert_eq!(slot.pixels(), &pixels[..]);

        // The next image still packs right after the surviving one.
        let next = scene.load_image_from_memory(RED_SQUARE_SVG.as_bytes(), ImageKind::Svg).unwrap();
        assert_eq!(scene.images.get(next).unwrap().rect.x, bitmap.rect.x + 6);
    }

    #[test]
    fn image_quad_hangs_below_origin_at_pixel_size() {
        let mut scene = screen_scene(100);
        let id = scene.load_image_from_memory(RED_SQUARE_SVG.as_bytes(), ImageKind::Svg).unwrap();
        scene.add_image(id, Vec2::new(0.0, 0.0));
        assert_eq!(scene.len(), 6);

        let v = scene.vertices();
        let k = 2.0 / 100.0;
        // Bottom-left corner: 4px below the top-left origin.
        assert!((v[0].position[0] + 1.0).abs() < 1e-5);
        assert!((v[0].position[1] - (1.0 - 4.0 * k)).abs() < 1e-5);
        assert!((v[2].position[0] - (-1.0 + 6.0 * k)).abs() < 1e-5);
        assert!((v[2].position[1] - 1.0).abs() < 1e-5);
        assert!(v.iter().all(|v| v.texture == 0.0 && v.color == [1.0; 4]));
        assert_eq!(v[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn invalid_image_handle_draws_nothing() {
        let mut scene = screen_scene(100);
        scene.add_image(ImageId(3), Vec2::zero());
        assert!(scene.is_empty());
    }
}
