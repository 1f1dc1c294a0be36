use crate::engine::components::vertex::Vertex;
use crate::engine::error::RenderError;

/// CPU-side triangle list. Built once by the shape generators and never edited.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) indices: Vec<u16>,
}

impl Mesh {
    /// Checks the triangle-list invariants before accepting the buffers.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Result<Self, RenderError> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| usize::from(i) >= vertices.len()) {
            return Err(RenderError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }
        Ok(Self { vertices, indices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
