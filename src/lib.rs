//! Animated, textured torus over a flat background, drawn with OpenGL.
//!
//! The embedding application owns the window and GL context and calls
//! [`Scene::render_frame`] once per tick; everything GPU-side is created
//! lazily on the first frame and kept for the life of the scene.

pub mod config;
pub mod engine;

pub use config::{ AppConfig, SceneConfig };
pub use engine::{ DecodedImage, GlDevice, GraphicsDevice, Lifecycle, RenderError, Scene };
