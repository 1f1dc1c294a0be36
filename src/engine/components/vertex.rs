use std::mem::{ offset_of, size_of };

use bytemuck::{ Pod, Zeroable };

use crate::engine::utils::math::Vec3;

/// Interleaved vertex as it sits in the GPU array buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: [f32; 2],
    pub color: Vec3,
}

/// One float attribute inside [`Vertex`]: component count and byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeLayout {
    pub components: i32,
    pub offset: i32,
}

impl Vertex {
    pub const STRIDE: i32 = size_of::<Vertex>() as i32;

    pub const POSITION: AttributeLayout = AttributeLayout {
        components: 3,
        offset: offset_of!(Vertex, position) as i32,
    };
    pub const NORMAL: AttributeLayout = AttributeLayout {
        components: 3,
        offset: offset_of!(Vertex, normal) as i32,
    };
    pub const TEX_COORD: AttributeLayout = AttributeLayout {
        components: 2,
        offset: offset_of!(Vertex, tex_coord) as i32,
    };
    pub const COLOR: AttributeLayout = AttributeLayout {
        components: 3,
        offset: offset_of!(Vertex, color) as i32,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 44);
        assert_eq!(Vertex::POSITION.offset, 0);
        assert_eq!(Vertex::NORMAL.offset, 12);
        assert_eq!(Vertex::TEX_COORD.offset, 24);
        assert_eq!(Vertex::COLOR.offset, 32);
    }
}
