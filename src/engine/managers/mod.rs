pub mod image_loader;
pub mod shader_manager;
pub mod texture_manager;

pub use image_loader::{ FileImageDecoder, ImageDecoder };
pub use shader_manager::{ compile_shader, link_program, GlslDialect, ShaderProgram, ShaderStage };
pub use texture_manager::{ noise_image, upload_texture, DecodedImage };
