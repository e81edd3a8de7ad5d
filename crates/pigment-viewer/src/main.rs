//! Pigment viewer: one window, one scene, every primitive the engine draws.
//!
//! Set `PIGMENT_FONT` to a TTF/OTF path to override the default font.

mod showcase;

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use pigment_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use pigment_engine::logging::{init_logging, LoggingConfig};
use pigment_engine::render::{RenderTarget, SceneRenderer};
use pigment_engine::scene::{Scene, SceneConfig};
use pigment_engine::text::FontLibrary;

use showcase::Showcase;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

struct Viewer {
    gpu: Gpu,
    scene: Scene,
    renderer: SceneRenderer,
    showcase: Showcase,
}

impl Viewer {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("pigment viewer")
            .with_inner_size(LogicalSize::new(960.0, 640.0));
        let window = Arc::new(event_loop.create_window(attrs).context("failed to create window")?);

        let gpu = pollster::block_on(Gpu::new(window, GpuInit::default()))?;
        let config = SceneConfig {
            max_texture_size: gpu.max_texture_size(),
            ..SceneConfig::default()
        };
        let mut scene = Scene::new(config, gpu.viewport());

        let mut library = FontLibrary::new();
        let font_path = std::env::var("PIGMENT_FONT").unwrap_or_else(|_| DEFAULT_FONT.to_owned());
        let scale = gpu.window().scale_factor() as f32;
        let showcase = Showcase::load(&mut scene, &mut library, &font_path, scale);

        Ok(Self { gpu, scene, renderer: SceneRenderer::new(), showcase })
    }

    fn redraw(&mut self) -> Result<()> {
        self.scene.reset(self.gpu.viewport());
        self.showcase.build(&mut self.scene);

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("frame skipped: {err}");
                return match self.gpu.handle_surface_error(err.clone()) {
                    SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("unrecoverable surface error: {err}")),
                    _ => Ok(()),
                };
            }
        };

        {
            let ctx = self.gpu.render_ctx();
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            target.clear(showcase::BACKGROUND);
            self.renderer.draw_scene(&ctx, &mut target, &self.scene);
        }

        self.gpu.submit(frame);
        Ok(())
    }
}

#[derive(Default)]
struct App {
    viewer: Option<Viewer>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match Viewer::new(event_loop) {
            Ok(viewer) => {
                viewer.gpu.window().request_redraw();
                self.viewer = Some(viewer);
            }
            Err(err) => {
                log::error!("failed to start viewer: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(viewer) = self.viewer.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                viewer.gpu.resize(size);
                viewer.gpu.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = viewer.redraw() {
                    log::error!("{err:#}");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::default();
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;
    Ok(())
}
