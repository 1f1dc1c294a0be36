//! Row-major 4x4 matrix helpers.
//!
//! Matrices are stored as `[f32; 16]` in row-major order and act on column
//! vectors, so in `mat4x4_mul(a, b)` the matrix `b` is applied first.
//! Upload with `transpose = true` when handing them to GL.

pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];
pub type Mat4x4 = [f32; 16];

pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_scale(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
       x,  0.0, 0.0, 0.0,
      0.0,  y,  0.0, 0.0,
      0.0, 0.0,  z,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_rot_x(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
      1.0, 0.0, 0.0, 0.0,
      0.0,  c,  -s,  0.0,
      0.0,  s,   c,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_rot_y(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
       c,  0.0,  s,  0.0,
      0.0, 1.0, 0.0, 0.0,
      -s,  0.0,  c,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_rot_z(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
       c,  -s,  0.0, 0.0,
       s,   c,  0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

/// Symmetric perspective frustum with the given half extents at the near plane.
pub fn mat4x4_frustum(half_width: f32, half_height: f32, near: f32, far: f32) -> Mat4x4 {
    let depth = far - near;

    [
        near / half_width, 0.0,                0.0,                   0.0,
        0.0,               near / half_height, 0.0,                   0.0,
        0.0,               0.0,                -(far + near) / depth, -2.0 * far * near / depth,
        0.0,               0.0,                -1.0,                  0.0,
    ]
}

pub fn mat4x4_transpose(matrix: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for i in 0..16 {
        let row = i / 4;
        let col = i % 4;
        ret[col * 4 + row] = matrix[row * 4 + col];
    }
    ret
}

pub fn vec4_dot(a: Vec4, b: Vec4) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub fn mat4x4_row(mat: &Mat4x4, row: usize) -> Vec4 {
    let start_idx = row * 4;
    [mat[start_idx], mat[start_idx + 1], mat[start_idx + 2], mat[start_idx + 3]]
}

pub fn mat4x4_col(mat: &Mat4x4, col: usize) -> Vec4 {
    [mat[col], mat[4 + col], mat[8 + col], mat[12 + col]]
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, cell) in ret.iter_mut().enumerate() {
        let row = i / 4;
        let col = i % 4;
        *cell = vec4_dot(mat4x4_row(&a, row), mat4x4_col(&b, col));
    }
    ret
}

/// Multiplies the matrix by a column vector.
pub fn mat4x4_transform_vec4(mat: Mat4x4, v: Vec4) -> Vec4 {
    [
        vec4_dot(mat4x4_row(&mat, 0), v),
        vec4_dot(mat4x4_row(&mat, 1), v),
        vec4_dot(mat4x4_row(&mat, 2), v),
        vec4_dot(mat4x4_row(&mat, 3), v),
    ]
}

/// Composes a sequence of matrices left to right, so the last one applies first.
pub fn mat4x4_chain(matrices: &[Mat4x4]) -> Mat4x4 {
    matrices.iter().fold(mat4x4_identity(), |acc, m| mat4x4_mul(acc, *m))
}
