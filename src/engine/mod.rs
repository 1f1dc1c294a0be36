pub mod error;
pub mod utils;
pub mod components;
pub mod managers;
pub mod rendering;

// Re-export all commonly used items for easy access
pub use components::*;
pub use error::RenderError;
pub use managers::*;
pub use rendering::*;
pub use utils::*;
