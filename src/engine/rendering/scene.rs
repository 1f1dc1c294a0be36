//! The per-frame render state machine.
//!
//! A [`Scene`] starts out `Uninitialized`. The first [`Scene::render_frame`]
//! builds both meshes, links both shader programs and uploads the torus
//! texture, then moves to `Ready`. Every later frame only clears, draws the
//! background, advances the spin angle and draws the torus.

use std::f64::consts::PI;

use log::{ info, warn };

use crate::config::SceneConfig;
use crate::engine::components::draw_object::DrawObject;
use crate::engine::components::shapes::{ generate_background_quads, generate_torus };
use crate::engine::components::vertex::Vertex;
use crate::engine::error::RenderError;
use crate::engine::managers::shader_manager::ShaderProgram;
use crate::engine::managers::texture_manager::{ upload_texture, DecodedImage };
use crate::engine::rendering::device::GraphicsDevice;
use crate::engine::utils::math::{
    mat4x4_chain,
    mat4x4_frustum,
    mat4x4_rot_x,
    mat4x4_rot_y,
    mat4x4_rot_z,
    mat4x4_scale,
    mat4x4_translate,
    Mat4x4,
};

/// The spin angle wraps here. The three rotations run at `angle`, `angle / 2`
/// and `angle / 3`, and all complete whole turns over 12π.
pub const ANGLE_PERIOD: f64 = 12.0 * PI;

const TORUS_SCALE: f32 = 1.0;

const BACKGROUND_VERTEX_SHADER: &str = include_str!("../../assets/shaders/vertex_background.glsl");
const BACKGROUND_FRAGMENT_SHADER: &str = include_str!("../../assets/shaders/fragment_background.glsl");
const TORUS_VERTEX_SHADER: &str = include_str!("../../assets/shaders/vertex_torus.glsl");
const TORUS_FRAGMENT_SHADER: &str = include_str!("../../assets/shaders/fragment_torus.glsl");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    /// Initialization failed. Resources are never created twice, so the
    /// scene stays here.
    Faulted,
}

/// GPU resources created on the first frame.
pub struct SceneResources<G: GraphicsDevice> {
    pub background: DrawObject<G>,
    pub torus: DrawObject<G>,
    pub texture: G::Texture,
    pvw_uniform: G::UniformLocation,
    rotation_uniform: G::UniformLocation,
    texture_uniform: G::UniformLocation,
}

enum SceneState<G: GraphicsDevice> {
    Uninitialized,
    Ready(SceneResources<G>),
    Faulted,
}

/// Matrices for one torus draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub projection: Mat4x4,
    /// Rotation only; used for normals so translation never reaches lighting.
    pub rotation: Mat4x4,
    /// Projection * translation * scale * rotation.
    pub pvw: Mat4x4,
}

pub struct Scene<G: GraphicsDevice> {
    config: SceneConfig,
    texture_image: DecodedImage,
    state: SceneState<G>,
    angle: f64,
}

impl<G: GraphicsDevice> Scene<G> {
    /// Validates everything that can be checked without a GPU.
    pub fn new(config: SceneConfig, texture_image: DecodedImage) -> Result<Self, RenderError> {
        config.validate()?;
        texture_image.validate()?;

        Ok(Self {
            config,
            texture_image,
            state: SceneState::Uninitialized,
            angle: 0.0,
        })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            SceneState::Uninitialized => Lifecycle::Uninitialized,
            SceneState::Ready(_) => Lifecycle::Ready,
            SceneState::Faulted => Lifecycle::Faulted,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn resources(&self) -> Option<&SceneResources<G>> {
        match &self.state {
            SceneState::Ready(resources) => Some(resources),
            _ => None,
        }
    }

    /// Draws one frame into the current framebuffer.
    ///
    /// The GL context must be current; presenting the frame is up to the caller.
    pub fn render_frame(&mut self, gpu: &G, width: u32, height: u32) -> Result<(), RenderError> {
        self.ensure_ready(gpu)?;
        let SceneState::Ready(resources) = &self.state else {
            return Err(RenderError::SceneFaulted);
        };

        if width == 0 || height == 0 {
            warn!("Degenerate {}x{} viewport, projecting as if 1 pixel wide", width, height);
        }

        let [r, g, b, a] = self.config.clear_color;
        gpu.viewport(0, 0, clamp_gl_size(width), clamp_gl_size(height));
        gpu.clear_color(r, g, b, a);
        gpu.clear_depth_f32(1.0);
        gpu.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        // The background never takes part in depth testing.
        gpu.disable(glow::DEPTH_TEST);
        resources.background.bind(gpu);
        resources.background.draw(gpu);
        check_gl(gpu, "draw background")?;

        gpu.clear(glow::DEPTH_BUFFER_BIT);

        self.angle = advance_angle(self.angle, self.config.angle_step);
        let transform = frame_transform(&self.config, self.angle, width, height);

        gpu.enable(glow::DEPTH_TEST);
        gpu.depth_func(glow::LESS);
        resources.torus.bind(gpu);
        gpu.uniform_matrix_4_f32_slice(Some(&resources.pvw_uniform), true, &transform.pvw);
        gpu.uniform_matrix_4_f32_slice(Some(&resources.rotation_uniform), true, &transform.rotation);
        gpu.active_texture(glow::TEXTURE0);
        gpu.bind_texture(glow::TEXTURE_2D, Some(resources.texture));
        gpu.uniform_1_i32(Some(&resources.texture_uniform), 0);
        resources.torus.draw(gpu);

        gpu.bind_vertex_array(None);
        check_gl(gpu, "draw torus")
    }

    fn ensure_ready(&mut self, gpu: &G) -> Result<(), RenderError> {
        match self.lifecycle() {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Faulted => Err(RenderError::SceneFaulted),
            Lifecycle::Uninitialized => {
                match create_resources(gpu, &self.config, &self.texture_image) {
                    Ok(resources) => {
                        self.state = SceneState::Ready(resources);
                        info!("Scene ready");
                        Ok(())
                    }
                    Err(e) => {
                        self.state = SceneState::Faulted;
                        Err(e)
                    }
                }
            }
        }
    }
}

fn create_resources<G: GraphicsDevice>(
    gpu: &G,
    config: &SceneConfig,
    texture_image: &DecodedImage
) -> Result<SceneResources<G>, RenderError> {
    let background_mesh = generate_background_quads();
    let torus_mesh = generate_torus(config.ring_resolution, config.major_radius, config.minor_radius)?;
    info!(
        "Generated torus mesh: {} vertices, {} indices",
        torus_mesh.vertex_count(),
        torus_mesh.index_count()
    );

    let background_program = ShaderProgram::build(
        gpu,
        "background",
        BACKGROUND_VERTEX_SHADER,
        BACKGROUND_FRAGMENT_SHADER,
        config.glsl
    )?;
    let torus_program = ShaderProgram::build(
        gpu,
        "torus",
        TORUS_VERTEX_SHADER,
        TORUS_FRAGMENT_SHADER,
        config.glsl
    )?;

    let pvw_uniform = torus_program.require_uniform(gpu, "u_pvw")?;
    let rotation_uniform = torus_program.require_uniform(gpu, "u_rotation")?;
    let texture_uniform = torus_program.require_uniform(gpu, "u_texture")?;

    let background = DrawObject::upload(
        gpu,
        &background_mesh,
        background_program,
        &[("a_position", Vertex::POSITION), ("a_color", Vertex::COLOR)]
    )?;
    let torus = DrawObject::upload(
        gpu,
        &torus_mesh,
        torus_program,
        &[
            ("a_position", Vertex::POSITION),
            ("a_normal", Vertex::NORMAL),
            ("a_texcoord", Vertex::TEX_COORD),
            ("a_color", Vertex::COLOR),
        ]
    )?;

    let texture = upload_texture(gpu, texture_image.width, texture_image.height, &texture_image.pixels)?;
    check_gl(gpu, "scene initialization")?;

    Ok(SceneResources {
        background,
        torus,
        texture,
        pvw_uniform,
        rotation_uniform,
        texture_uniform,
    })
}

fn check_gl<G: GraphicsDevice>(gpu: &G, operation: &'static str) -> Result<(), RenderError> {
    match gpu.get_error() {
        glow::NO_ERROR => Ok(()),
        code => Err(RenderError::gl_code(operation, code)),
    }
}

fn clamp_gl_size(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

/// Adds `step` and wraps the result into `[0, ANGLE_PERIOD)`.
pub fn advance_angle(angle: f64, step: f64) -> f64 {
    let wrapped = (angle + step).rem_euclid(ANGLE_PERIOD);
    // rem_euclid can round up to the period itself for tiny negative inputs.
    if wrapped >= ANGLE_PERIOD { 0.0 } else { wrapped }
}

/// Near-plane half extents, widening whichever viewport axis is longer.
pub fn frustum_extents(width: u32, height: u32, half_extent: f32) -> (f32, f32) {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    if w >= h {
        (half_extent * w / h, half_extent)
    } else {
        (half_extent, half_extent * h / w)
    }
}

/// Builds `P * T * S * Rz(a) * Ry(a/2) * Rx(a/3)` for the given spin angle.
pub fn frame_transform(config: &SceneConfig, angle: f64, width: u32, height: u32) -> FrameTransform {
    let (half_width, half_height) = frustum_extents(width, height, config.half_extent);

    let projection = mat4x4_frustum(half_width, half_height, config.near, config.far);
    let rotation = mat4x4_chain(&[
        mat4x4_rot_z(angle as f32),
        mat4x4_rot_y((angle / 2.0) as f32),
        mat4x4_rot_x((angle / 3.0) as f32),
    ]);
    let pvw = mat4x4_chain(&[
        projection,
        mat4x4_translate(0.0, 0.0, -config.camera_distance),
        mat4x4_scale(TORUS_SCALE, TORUS_SCALE, TORUS_SCALE),
        rotation,
    ]);

    FrameTransform { projection, rotation, pvw }
}
