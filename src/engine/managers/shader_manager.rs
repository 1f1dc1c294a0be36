use std::fmt;

use log::{ debug, info };
use serde::{ Deserialize, Serialize };

use crate::engine::error::RenderError;
use crate::engine::rendering::device::GraphicsDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Which GLSL flavour the `#VERSION` placeholder in the sources expands to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlslDialect {
    #[default]
    Desktop,
    Gles,
}

impl GlslDialect {
    fn header(self) -> &'static str {
        match self {
            GlslDialect::Desktop => "#version 330 core",
            GlslDialect::Gles => "#version 300 es\nprecision mediump float;",
        }
    }

    pub fn expand(self, source: &str) -> String {
        source.replace("#VERSION", self.header())
    }
}

pub fn compile_shader<G: GraphicsDevice>(
    gpu: &G,
    program_name: &str,
    stage: ShaderStage,
    source: &str
) -> Result<G::Shader, RenderError> {
    let shader = gpu.create_shader(stage.gl_enum()).map_err(|detail| RenderError::GraphicsApi {
        operation: "create shader",
        detail,
    })?;
    gpu.shader_source(shader, source);
    gpu.compile_shader(shader);

    if !gpu.get_shader_compile_status(shader) {
        let log = gpu.get_shader_info_log(shader);
        gpu.delete_shader(shader);
        return Err(RenderError::Compile { program: program_name.to_string(), stage, log });
    }
    Ok(shader)
}

/// Links two compiled stages. The stage objects are released either way.
pub fn link_program<G: GraphicsDevice>(
    gpu: &G,
    program_name: &str,
    vertex: G::Shader,
    fragment: G::Shader
) -> Result<G::Program, RenderError> {
    let program = match gpu.create_program() {
        Ok(program) => program,
        Err(detail) => {
            gpu.delete_shader(vertex);
            gpu.delete_shader(fragment);
            return Err(RenderError::GraphicsApi { operation: "create program", detail });
        }
    };
    gpu.attach_shader(program, vertex);
    gpu.attach_shader(program, fragment);
    gpu.link_program(program);
    let linked = gpu.get_program_link_status(program);

    gpu.detach_shader(program, vertex);
    gpu.detach_shader(program, fragment);
    gpu.delete_shader(vertex);
    gpu.delete_shader(fragment);

    if !linked {
        let log = gpu.get_program_info_log(program);
        gpu.delete_program(program);
        return Err(RenderError::Link { program: program_name.to_string(), log });
    }
    Ok(program)
}

/// A linked program plus the name used in diagnostics.
pub struct ShaderProgram<G: GraphicsDevice> {
    pub name: String,
    pub handle: G::Program,
}

impl<G: GraphicsDevice> ShaderProgram<G> {
    pub fn build(
        gpu: &G,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
        dialect: GlslDialect
    ) -> Result<Self, RenderError> {
        let vs = compile_shader(gpu, name, ShaderStage::Vertex, &dialect.expand(vertex_source))?;
        let fs = match
            compile_shader(gpu, name, ShaderStage::Fragment, &dialect.expand(fragment_source))
        {
            Ok(fs) => fs,
            Err(e) => {
                gpu.delete_shader(vs);
                return Err(e);
            }
        };
        let handle = link_program(gpu, name, vs, fs)?;

        info!("Linked {} shader program", name);
        Ok(Self { name: name.to_string(), handle })
    }

    /// `None` when the program has no active attribute of that name.
    pub fn locate_attribute(&self, gpu: &G, name: &str) -> Option<u32> {
        let location = gpu.get_attrib_location(self.handle, name);
        debug!("{} attribute {} -> {:?}", self.name, name, location);
        location
    }

    /// `None` when the program has no active uniform of that name.
    pub fn locate_uniform(&self, gpu: &G, name: &str) -> Option<G::UniformLocation> {
        let location = gpu.get_uniform_location(self.handle, name);
        debug!("{} uniform {} -> {:?}", self.name, name, location);
        location
    }

    pub fn require_attribute(&self, gpu: &G, name: &str) -> Result<u32, RenderError> {
        self.locate_attribute(gpu, name).ok_or_else(|| self.missing(name))
    }

    pub fn require_uniform(&self, gpu: &G, name: &str) -> Result<G::UniformLocation, RenderError> {
        self.locate_uniform(gpu, name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> RenderError {
        RenderError::MissingLocation { program: self.name.clone(), name: name.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_header_replaces_placeholder() {
        let src = GlslDialect::Desktop.expand("#VERSION\nvoid main() {}");
        assert!(src.starts_with("#version 330 core\n"));
        assert!(!src.contains("#VERSION"));
    }

    #[test]
    fn gles_header_sets_precision() {
        let src = GlslDialect::Gles.expand("#VERSION\nvoid main() {}");
        assert!(src.starts_with("#version 300 es\nprecision mediump float;\n"));
    }

    #[test]
    fn dialect_reads_lowercase_names() {
        let dialect: GlslDialect = serde_json::from_str("\"gles\"").unwrap();
        assert_eq!(dialect, GlslDialect::Gles);
    }
}
