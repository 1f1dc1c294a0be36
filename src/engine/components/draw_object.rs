use log::debug;

use crate::engine::components::mesh::Mesh;
use crate::engine::components::vertex::{ AttributeLayout, Vertex };
use crate::engine::error::RenderError;
use crate::engine::managers::shader_manager::ShaderProgram;
use crate::engine::rendering::device::GraphicsDevice;

/// A mesh living in GPU buffers, paired with the program that draws it.
pub struct DrawObject<G: GraphicsDevice> {
    pub program: ShaderProgram<G>,
    pub vao: G::VertexArray,
    pub vertex_buffer: G::Buffer,
    pub index_buffer: G::Buffer,
    pub index_count: i32,
    attributes: Vec<(u32, AttributeLayout)>,
}

impl<G: GraphicsDevice> DrawObject<G> {
    /// Uploads `mesh` and resolves the named vertex attributes in `program`.
    ///
    /// Every listed attribute must be active in the program.
    pub fn upload(
        gpu: &G,
        mesh: &Mesh,
        program: ShaderProgram<G>,
        attributes: &[(&str, AttributeLayout)]
    ) -> Result<Self, RenderError> {
        let attributes = attributes
            .iter()
            .map(|(name, layout)| Ok((program.require_attribute(gpu, name)?, *layout)))
            .collect::<Result<Vec<_>, RenderError>>()?;

        let vao = gpu.create_vertex_array().map_err(|detail| RenderError::GraphicsApi {
            operation: "create vertex array",
            detail,
        })?;
        gpu.bind_vertex_array(Some(vao));

        let vertex_buffer = create_buffer(gpu, "create vertex buffer")?;
        gpu.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
        gpu.buffer_data_u8_slice(glow::ARRAY_BUFFER, mesh.vertex_bytes(), glow::STATIC_DRAW);

        let index_buffer = create_buffer(gpu, "create index buffer")?;
        gpu.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
        gpu.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, mesh.index_bytes(), glow::STATIC_DRAW);

        gpu.bind_vertex_array(None);

        debug!(
            "Uploaded {} mesh: {} vertices, {} indices",
            program.name,
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Self {
            program,
            vao,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as i32,
            attributes,
        })
    }

    /// Makes this object's program, buffers and vertex attributes current.
    pub fn bind(&self, gpu: &G) {
        gpu.use_program(Some(self.program.handle));
        gpu.bind_vertex_array(Some(self.vao));
        gpu.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
        gpu.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.index_buffer));

        let stride = Vertex::STRIDE;
        for (location, layout) in &self.attributes {
            gpu.enable_vertex_attrib_array(*location);
            gpu.vertex_attrib_pointer_f32(
                *location,
                layout.components,
                glow::FLOAT,
                false,
                stride,
                layout.offset
            );
        }
    }

    /// Issues the indexed triangle-list draw. Call after [`Self::bind`].
    pub fn draw(&self, gpu: &G) {
        gpu.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_SHORT, 0);
    }
}

fn create_buffer<G: GraphicsDevice>(gpu: &G, operation: &'static str) -> Result<G::Buffer, RenderError> {
    gpu.create_buffer().map_err(|detail| RenderError::GraphicsApi { operation, detail })
}
