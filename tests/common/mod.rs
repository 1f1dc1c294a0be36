#![allow(dead_code)]

use std::cell::{ Cell, RefCell };
use std::collections::HashMap;

use torus_scene::GraphicsDevice;

/// One GL call as seen by [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader { kind: u32, id: u32 },
    DeleteShader(u32),
    CreateProgram(u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    CreateBuffer(u32),
    BindBuffer { target: u32, buffer: Option<u32> },
    BufferData { target: u32, len: usize },
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    EnableAttrib(u32),
    AttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    CreateTexture(u32),
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    TexParameter { parameter: u32, value: i32 },
    TexImage { width: i32, height: i32, len: usize },
    UniformMatrix { location: u32, transpose: bool, value: Vec<f32> },
    Uniform1i { location: u32, value: i32 },
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Clear(u32),
    Enable(u32),
    Disable(u32),
    DepthFunc(u32),
    DrawElements { program: Option<u32>, mode: u32, count: i32, element_type: u32 },
}

/// Headless [`GraphicsDevice`] that hands out integer handles and logs calls.
///
/// Compilation fails for sources containing `#error`, or for every shader of
/// the kind set in `fail_compile`. Attribute and uniform
/// names resolve when they appear in the sources linked into the program.
#[derive(Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    shader_sources: RefCell<HashMap<u32, (u32, String)>>,
    program_sources: RefCell<HashMap<u32, Vec<(u32, String)>>>,
    locations: RefCell<HashMap<(u32, String), u32>>,
    current_program: Cell<Option<u32>>,
    pending_error: Cell<u32>,
    pub fail_link: Cell<bool>,
    /// Fail every compile of this shader kind.
    pub fail_compile: Cell<Option<u32>>,
    /// GL error raised by the next draw call, if non-zero.
    pub fail_next_draw: Cell<u32>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self { next_id: Cell::new(1), ..Self::default() }
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draw_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| matches!(c, Call::DrawElements { .. })).collect()
    }

    /// Number of GL objects created so far, of any kind.
    pub fn creations(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateShader { .. } |
                        Call::CreateProgram(_) |
                        Call::CreateBuffer(_) |
                        Call::CreateVertexArray(_) |
                        Call::CreateTexture(_)
                )
            })
            .count()
    }

    /// The linked program whose sources contain `needle`.
    pub fn program_containing(&self, needle: &str) -> Option<u32> {
        self.program_sources
            .borrow()
            .iter()
            .find(|(_, sources)| sources.iter().any(|(_, src)| src.contains(needle)))
            .map(|(program, _)| *program)
    }

    pub fn shader_source_of(&self, shader: u32) -> Option<String> {
        self.shader_sources.borrow().get(&shader).map(|(_, src)| src.clone())
    }

    pub fn location_of(&self, program: u32, name: &str) -> Option<u32> {
        self.locations.borrow().get(&(program, name.to_string())).copied()
    }

    /// The last matrix uploaded to `name` in `program`.
    pub fn last_matrix(&self, program: u32, name: &str) -> Option<Vec<f32>> {
        let location = self.location_of(program, name)?;
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::UniformMatrix { location: l, value, .. } if *l == location => Some(value.clone()),
            _ => None,
        })
    }

    fn resolve(&self, program: u32, name: &str, stage: Option<u32>) -> Option<u32> {
        let declared = self
            .program_sources
            .borrow()
            .get(&program)?
            .iter()
            .any(|(kind, src)| stage.map_or(true, |s| s == *kind) && src.contains(name));
        if !declared {
            return None;
        }
        let key = (program, name.to_string());
        if let Some(location) = self.locations.borrow().get(&key) {
            return Some(*location);
        }
        let location = self.allocate();
        self.locations.borrow_mut().insert(key, location);
        Some(location)
    }
}

impl GraphicsDevice for RecordingDevice {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
        let id = self.allocate();
        self.shader_sources.borrow_mut().insert(id, (shader_type, String::new()));
        self.record(Call::CreateShader { kind: shader_type, id });
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(entry) = self.shader_sources.borrow_mut().get_mut(&shader) {
            entry.1 = source.to_string();
        }
    }

    fn compile_shader(&self, _shader: u32) {}

    fn get_shader_compile_status(&self, shader: u32) -> bool {
        match self.shader_sources.borrow().get(&shader) {
            Some((kind, src)) => {
                Some(*kind) != self.fail_compile.get() && !src.contains("#error")
            }
            None => false,
        }
    }

    fn get_shader_info_log(&self, shader: u32) -> String {
        if self.get_shader_compile_status(shader) {
            String::new()
        } else {
            "0:3(1): error: #error directive encountered\n".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.program_sources.borrow_mut().insert(id, Vec::new());
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let entry = self.shader_sources.borrow().get(&shader).cloned();
        if let (Some(entry), Some(sources)) = (entry, self.program_sources.borrow_mut().get_mut(&program)) {
            sources.push(entry);
        }
    }

    fn detach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn get_program_link_status(&self, _program: u32) -> bool {
        !self.fail_link.get()
    }

    fn get_program_info_log(&self, program: u32) -> String {
        if self.fail_link.get() {
            format!("error: program {} has unresolved varyings\n", program)
        } else {
            String::new()
        }
    }

    fn delete_program(&self, program: u32) {
        self.program_sources.borrow_mut().remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.current_program.set(program);
        self.record(Call::UseProgram(program));
    }

    fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.resolve(program, name, Some(glow::VERTEX_SHADER))
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.resolve(program, name, None)
    }

    fn uniform_1_i32(&self, location: Option<&u32>, x: i32) {
        if let Some(location) = location {
            self.record(Call::Uniform1i { location: *location, value: x });
        }
    }

    fn uniform_matrix_4_f32_slice(&self, location: Option<&u32>, transpose: bool, v: &[f32]) {
        if let Some(location) = location {
            self.record(Call::UniformMatrix { location: *location, transpose, value: v.to_vec() });
        }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(Call::BindBuffer { target, buffer });
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(Call::BufferData { target, len: data.len() });
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        _data_type: u32,
        _normalized: bool,
        stride: i32,
        offset: i32
    ) {
        self.record(Call::AttribPointer { index, size, stride, offset });
    }

    fn create_texture(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(Call::CreateTexture(id));
        Ok(id)
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, _target: u32, texture: Option<u32>) {
        self.record(Call::BindTexture(texture));
    }

    fn tex_parameter_i32(&self, _target: u32, parameter: u32, value: i32) {
        self.record(Call::TexParameter { parameter, value });
    }

    fn tex_image_2d_rgba8(&self, _target: u32, width: i32, height: i32, pixels: &[u8]) {
        self.record(Call::TexImage { width, height, len: pixels.len() });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear_depth_f32(&self, depth: f32) {
        self.record(Call::ClearDepth(depth));
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn enable(&self, parameter: u32) {
        self.record(Call::Enable(parameter));
    }

    fn disable(&self, parameter: u32) {
        self.record(Call::Disable(parameter));
    }

    fn depth_func(&self, func: u32) {
        self.record(Call::DepthFunc(func));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, _offset: i32) {
        let error = self.fail_next_draw.replace(glow::NO_ERROR);
        if error != glow::NO_ERROR {
            self.pending_error.set(error);
        }
        self.record(Call::DrawElements {
            program: self.current_program.get(),
            mode,
            count,
            element_type,
        });
    }

    fn get_error(&self) -> u32 {
        self.pending_error.replace(glow::NO_ERROR)
    }
}
