//! Windowed driver for the torus scene.
//!
//! winit owns the event loop, glutin provides the GL context and a periodic
//! tick asks for a redraw. Everything drawn comes from `torus_scene::Scene`.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::{ Duration, Instant };

use anyhow::Context;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ ContextApi, ContextAttributesBuilder, GlProfile, Version };
use glutin::display::{ Display, DisplayApiPreference };
use glutin::prelude::*;
use glutin::surface::{ SurfaceAttributesBuilder, WindowSurface };
use glutin_winit::GlWindow;
use log::{ error, info, warn };
use raw_window_handle::{ HasDisplayHandle, HasWindowHandle, RawWindowHandle };
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ StartCause, WindowEvent };
use winit::event_loop::{ ActiveEventLoop, ControlFlow, EventLoop };
use winit::window::{ Window, WindowId };

use torus_scene::engine::managers::{ noise_image, FileImageDecoder, ImageDecoder };
use torus_scene::{ AppConfig, DecodedImage, GlDevice, Scene };

// Field order is drop order: GL objects go before the window they render to.
struct Graphics {
    device: GlDevice,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    window: Window,
}

struct App {
    config: AppConfig,
    scene: Scene<GlDevice>,
    graphics: Option<Graphics>,
    tick: Duration,
    failure: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn schedule_tick(&self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.tick));
    }

    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Graphics> {
        let window_config = &self.config.window;
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title(window_config.title.clone())
                .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
        )?;

        let raw_handle = window.window_handle()?.as_raw();
        let display = unsafe {
            Display::new(event_loop.display_handle()?.as_raw(), display_preference(raw_handle))?
        };
        let template = ConfigTemplateBuilder::new()
            .with_depth_size(24)
            .compatible_with_native_window(raw_handle)
            .build();
        let gl_config = pick_config(unsafe { display.find_configs(template)? }, |c| c.num_samples())
            .context("display offered no GL configs")?;
        let ctx_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&gl_config, &ctx_attrs)? };

        let size = window.inner_size();
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width.max(1)).context("zero width")?,
            NonZeroU32::new(size.height.max(1)).context("zero height")?
        );
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };
        // The context was made current above and stays current on this thread.
        let device = unsafe { GlDevice::new(gl) };

        info!("Created {}x{} GL window", size.width, size.height);
        Ok(Graphics { device, gl_surface, gl_context, window })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.create_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
                self.schedule_tick(event_loop);
            }
            Err(e) => self.fail(event_loop, e.context("setting up the GL window")),
        }
    }

    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(graphics) = &self.graphics {
                graphics.window.request_redraw();
            }
            self.schedule_tick(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(_) => {
                if let Some(graphics) = &self.graphics {
                    graphics.window.resize_surface(&graphics.gl_surface, &graphics.gl_context);
                    graphics.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(graphics) = &self.graphics else {
                    return;
                };
                let size = graphics.window.inner_size();
                let result = self.scene.render_frame(&graphics.device, size.width, size.height);
                let swapped = graphics.gl_surface.swap_buffers(&graphics.gl_context);

                match result {
                    Ok(()) => {}
                    Err(e) if e.is_fatal() => {
                        self.fail(event_loop, anyhow::Error::new(e).context("rendering frame"));
                        return;
                    }
                    Err(e) => error!("Frame failed: {}", e),
                }
                if let Err(e) = swapped {
                    self.fail(event_loop, anyhow::Error::new(e).context("swapping buffers"));
                }
            }

            _ => {}
        }
    }
}

#[cfg(target_os = "windows")]
fn display_preference(window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Wgl(Some(window))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

/// The config with the most samples; ties keep the earliest.
fn pick_config<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.reduce(|best, next| if samples(&next) > samples(&best) { next } else { best })
}

fn load_texture(config: &AppConfig) -> DecodedImage {
    let fallback = || noise_image(config.noise_size, config.noise_seed);
    let Some(path) = &config.texture else {
        info!("No texture configured, using {0}x{0} noise", config.noise_size);
        return fallback();
    };
    match FileImageDecoder.decode(path) {
        Ok(image) => image,
        Err(e) => {
            warn!("{:#}; falling back to noise", e);
            fallback()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    let texture = load_texture(&config);
    let scene = Scene::new(config.scene.clone(), texture)?;

    let event_loop = EventLoop::new()?;
    let mut app = App {
        tick: Duration::from_millis(config.tick_interval_ms),
        config,
        scene,
        graphics: None,
        failure: None,
    };
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_most_samples() {
        let configs = vec![("a", 0u8), ("b", 4), ("c", 4), ("d", 2)];
        assert_eq!(pick_config(configs.into_iter(), |c| c.1), Some(("b", 4)));
    }

    #[test]
    fn empty_config_list_picks_nothing() {
        let configs: Vec<(&str, u8)> = Vec::new();
        assert_eq!(pick_config(configs.into_iter(), |c| c.1), None);
    }
}
