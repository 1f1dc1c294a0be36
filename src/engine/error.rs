use std::fmt;

use crate::engine::managers::shader_manager::ShaderStage;

/// Everything that can go wrong while building or drawing the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Mesh or projection parameters rejected before touching the GPU.
    InvalidMesh(String),
    /// Pixel buffer does not match its declared dimensions.
    InvalidTexture { width: u32, height: u32, len: usize },
    Compile { program: String, stage: ShaderStage, log: String },
    Link { program: String, log: String },
    /// A required attribute or uniform is absent from a linked program.
    MissingLocation { program: String, name: String },
    /// GL reported an error code, or refused to create an object.
    GraphicsApi { operation: &'static str, detail: String },
    /// One-time initialization failed earlier; the scene will not retry it.
    SceneFaulted,
}

impl RenderError {
    pub fn gl_code(operation: &'static str, code: u32) -> Self {
        RenderError::GraphicsApi {
            operation,
            detail: format!("{} (0x{:04X})", gl_error_name(code), code),
        }
    }

    /// Errors after which no further frame can be meaningful.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::GraphicsApi { .. })
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidMesh(reason) => write!(f, "invalid mesh parameters: {}", reason),
            RenderError::InvalidTexture { width, height, len } => write!(
                f,
                "texture buffer of {} bytes does not match {}x{} RGBA",
                len, width, height
            ),
            RenderError::Compile { program, stage, log } => {
                write!(f, "failed to compile {} {} shader: {}", program, stage, log.trim_end())
            }
            RenderError::Link { program, log } => {
                write!(f, "failed to link {} shader program: {}", program, log.trim_end())
            }
            RenderError::MissingLocation { program, name } => {
                write!(f, "{} shader program has no active input named {:?}", program, name)
            }
            RenderError::GraphicsApi { operation, detail } => {
                write!(f, "graphics API error during {}: {}", operation, detail)
            }
            RenderError::SceneFaulted => write!(f, "scene initialization failed earlier"),
        }
    }
}

impl std::error::Error for RenderError {}

fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "unknown GL error",
    }
}
