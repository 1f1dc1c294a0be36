//! Procedural geometry for the two scene objects.

use std::f32::consts::TAU;

use crate::engine::components::mesh::Mesh;
use crate::engine::components::vertex::Vertex;
use crate::engine::error::RenderError;
use crate::engine::utils::math::Vec3;

/// Smallest ring resolution whose circles are not flat.
pub const MIN_RING_RESOLUTION: u32 = 3;

/// Largest ring resolution whose N² vertices still fit 16-bit indices.
pub const MAX_RING_RESOLUTION: u32 = 256;

/// Half-size of the background, in the units its vertex shader divides by.
pub const BACKGROUND_EXTENT: f32 = 100.0;

const BACKGROUND_NORMAL: Vec3 = [0.0, 0.0, 1.0];

// Quadrant sign and color, counter-clockwise from the upper right.
const BACKGROUND_QUADRANTS: [([f32; 2], Vec3); 4] = [
    ([1.0, 1.0], [0.16, 0.22, 0.38]),
    ([-1.0, 1.0], [0.30, 0.18, 0.34]),
    ([-1.0, -1.0], [0.14, 0.30, 0.26]),
    ([1.0, -1.0], [0.36, 0.28, 0.14]),
];

/// Builds an `n` x `n` torus around the Z axis.
///
/// Vertex `i * n + j` sits at major angle `2πi/n` and minor angle `2πj/n`; its
/// texture coordinate and red/green color channels are both `(i/n, j/n)`.
/// Each grid cell becomes two triangles and both directions wrap modulo `n`,
/// so the surface has no seam.
pub fn generate_torus(
    ring_resolution: u32,
    major_radius: f32,
    minor_radius: f32
) -> Result<Mesh, RenderError> {
    check_torus_parameters(ring_resolution, major_radius, minor_radius)?;

    let n = ring_resolution as usize;
    let step = 1.0 / ring_resolution as f32;

    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        let u = i as f32 * step;
        let (sin_theta, cos_theta) = (u * TAU).sin_cos();

        for j in 0..n {
            let v = j as f32 * step;
            let (sin_phi, cos_phi) = (v * TAU).sin_cos();

            // Minor circle in the XZ plane pushed out by the major radius,
            // then swung around Z. Normals only take the rotation.
            let radial = major_radius + minor_radius * cos_phi;
            vertices.push(Vertex {
                position: [radial * cos_theta, radial * sin_theta, minor_radius * sin_phi],
                normal: [cos_phi * cos_theta, cos_phi * sin_theta, sin_phi],
                tex_coord: [u, v],
                color: [u, v, 1.0],
            });
        }
    }

    let index = |i: usize, j: usize| ((i % n) * n + (j % n)) as u16;
    let mut indices = Vec::with_capacity(6 * n * n);
    for i in 0..n {
        for j in 0..n {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i, j + 1);
            let d = index(i + 1, j + 1);
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }

    Mesh::new(vertices, indices)
}

/// Four flat quads, one per screen quadrant, meeting at the origin.
pub fn generate_background_quads() -> Mesh {
    let mut vertices = Vec::with_capacity(16);
    let mut indices = Vec::with_capacity(24);

    for ([sx, sy], color) in BACKGROUND_QUADRANTS {
        let (x0, x1) = ordered(0.0, sx * BACKGROUND_EXTENT);
        let (y0, y1) = ordered(0.0, sy * BACKGROUND_EXTENT);
        let base = vertices.len() as u16;

        for (x, y, tex_coord) in [
            (x0, y0, [0.0, 0.0]),
            (x1, y0, [1.0, 0.0]),
            (x1, y1, [1.0, 1.0]),
            (x0, y1, [0.0, 1.0]),
        ] {
            vertices.push(Vertex {
                position: [x, y, 0.0],
                normal: BACKGROUND_NORMAL,
                tex_coord,
                color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    Mesh { vertices, indices }
}

/// Rejects parameters [`generate_torus`] cannot turn into a valid mesh.
pub fn check_torus_parameters(
    ring_resolution: u32,
    major_radius: f32,
    minor_radius: f32
) -> Result<(), RenderError> {
    if !(MIN_RING_RESOLUTION..=MAX_RING_RESOLUTION).contains(&ring_resolution) {
        return Err(RenderError::InvalidMesh(format!(
            "ring resolution {} outside {}..={}",
            ring_resolution, MIN_RING_RESOLUTION, MAX_RING_RESOLUTION
        )));
    }
    if !(major_radius.is_finite() && major_radius > 0.0) {
        return Err(RenderError::InvalidMesh(format!("major radius {} must be positive", major_radius)));
    }
    if !(minor_radius.is_finite() && minor_radius > 0.0) {
        return Err(RenderError::InvalidMesh(format!("minor radius {} must be positive", minor_radius)));
    }
    Ok(())
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
