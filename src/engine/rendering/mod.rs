pub mod device;
pub mod scene;

pub use device::{ GlDevice, GraphicsDevice };
pub use scene::{ Lifecycle, Scene };
