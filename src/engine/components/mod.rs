pub mod draw_object;
pub mod mesh;
pub mod shapes;
pub mod vertex;

pub use draw_object::DrawObject;
pub use mesh::Mesh;
pub use shapes::{ generate_background_quads, generate_torus };
pub use vertex::{ AttributeLayout, Vertex };
