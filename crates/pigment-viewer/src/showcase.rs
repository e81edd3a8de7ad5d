use std::f32::consts::{FRAC_PI_2, PI, TAU};

use pigment_engine::bitmap::{ImageId, ImageKind};
use pigment_engine::coords::Vec2;
use pigment_engine::paint::Color;
use pigment_engine::scene::{FontId, Scene};
use pigment_engine::text::FontLibrary;

pub const BACKGROUND: Color = Color::from_premul(0.09, 0.09, 0.11, 1.0);

const SWATCH_SVG: &[u8] = include_bytes!("../assets/swatch.svg");

const PANEL: Color = Color::from_premul(0.16, 0.16, 0.2, 1.0);
const ACCENT: Color = Color::from_premul(0.95, 0.55, 0.25, 1.0);
const TEAL: Color = Color::from_premul(0.2, 0.7, 0.65, 1.0);
const LABEL: Color = Color::from_premul(0.85, 0.85, 0.9, 1.0);

/// Static demo content laid out in physical pixels.
pub struct Showcase {
    font: Option<FontId>,
    swatch: Option<ImageId>,
    scale: f32,
}

impl Showcase {
    /// Loads the demo's font and image. Either may fail; the rest still draws.
    pub fn load(scene: &mut Scene, library: &mut FontLibrary, font_path: &str, scale: f32) -> Self {
        let size_px = (18.0 * scale).round() as u32;
        let font = scene.load_font(library, font_path, size_px, None).ok();
        let swatch = scene.load_image_from_memory(SWATCH_SVG, ImageKind::Svg).ok();
        Self { font, swatch, scale }
    }

    fn px(&self, v: f32) -> f32 {
        v * self.scale
    }

    fn at(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(self.px(x), self.px(y))
    }

    pub fn build(&self, scene: &mut Scene) {
        let s = |v: f32| self.px(v);

        scene.add_rounded_rectangle(self.at(20.0, 20.0), self.at(920.0, 600.0), s(16.0), 8, PANEL);
        scene.add_rounded_rectangle_outline(self.at(20.0, 20.0), self.at(920.0, 600.0), s(16.0), 8, s(2.0), TEAL);

        // Row 1: fills.
        scene.add_rectangle(self.at(60.0, 80.0), self.at(100.0, 70.0), ACCENT);
        scene.add_circle(self.at(240.0, 115.0), s(40.0), 48, TEAL);
        scene.add_circle_slice(self.at(360.0, 115.0), s(40.0), FRAC_PI_2, TAU, 32, ACCENT);
        scene.add_superellipse(self.at(480.0, 115.0), s(42.0), s(36.0), 4.0, 64, TEAL);
        scene.add_quad(
            [self.at(560.0, 150.0), self.at(660.0, 150.0), self.at(640.0, 80.0), self.at(580.0, 80.0)],
            ACCENT,
        );
        scene.add_rounded_quad(
            [self.at(700.0, 150.0), self.at(880.0, 150.0), self.at(860.0, 80.0), self.at(720.0, 80.0)],
            Some([true, false, true, false]),
            s(18.0),
            6,
            TEAL,
        );

        // Row 2: strokes.
        let t = s(3.0);
        scene.add_rectangle_outline(self.at(60.0, 200.0), self.at(100.0, 70.0), t, ACCENT);
        scene.add_circle_outline(self.at(240.0, 235.0), s(40.0), 48, t, TEAL);
        scene.add_circle_arc(self.at(360.0, 235.0), s(40.0), 0.0, PI * 1.5, 32, t, ACCENT);
        scene.add_superellipse_outline(self.at(480.0, 235.0), s(42.0), s(36.0), 0.8, 64, t, TEAL);
        scene.add_quad_outline(
            [self.at(560.0, 270.0), self.at(660.0, 270.0), self.at(640.0, 200.0), self.at(580.0, 200.0)],
            t,
            ACCENT,
        );
        scene.add_rounded_quad_outline(
            [self.at(700.0, 270.0), self.at(880.0, 270.0), self.at(860.0, 200.0), self.at(720.0, 200.0)],
            None,
            s(18.0),
            6,
            t,
            TEAL,
        );

        // Row 3: lines fanning out.
        for i in 0..12 {
            let angle = i as f32 / 12.0 * PI;
            let from = self.at(160.0, 420.0);
            let to = from + Vec2::new(angle.cos(), -angle.sin()) * s(90.0);
            scene.add_line(from, to, s(1.0 + i as f32 * 0.4), LABEL);
        }

        // Row 3: images.
        if let Some(swatch) = self.swatch {
            scene.add_image(swatch, self.at(320.0, 340.0));
            scene.add_image_sized(swatch, self.at(420.0, 330.0), self.at(128.0, 128.0), Color::white());
            scene.add_image_sized(swatch, self.at(580.0, 360.0), self.at(48.0, 48.0), Color::from_straight(1.0, 1.0, 1.0, 0.5));
        }

        // Row 4: text.
        let Some(font) = self.font else { return };
        let title = "pigment: one buffer, one draw call";
        let width = scene.measure_text_width(font, title);
        let center_x = self.px(480.0) - width * 0.5;
        scene.add_text(font, title, Vec2::new(center_x, self.px(530.0)), LABEL);
        scene.add_rectangle(Vec2::new(center_x, self.px(538.0)), Vec2::new(width, s(2.0)), ACCENT);

        scene.add_text(
            font,
            "shapes, glyphs and images\nshare the same vertex stream",
            self.at(60.0, 570.0),
            TEAL,
        );
    }
}
