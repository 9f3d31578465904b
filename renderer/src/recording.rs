// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::{ClearBuffers, DepthFunc, GraphicsContext, Primitive, ShaderStage};
use glam::UVec2;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A call made on a [`RecordingContext`].
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Call {
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    BufferStaticData(Vec<f32>),
    CreateShader { id: u32, stage: ShaderStage },
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    BindAttribLocation {
        program: u32,
        index: u32,
        name: String,
    },
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    VertexAttribPointer {
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    UniformMatrix4fv {
        name: String,
        transpose: bool,
        data: [f32; 16],
    },
    Viewport(UVec2),
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Clear(ClearBuffers),
    EnableDepthTest,
    DepthFunc(DepthFunc),
    DrawArrays {
        primitive: Primitive,
        first: i32,
        count: i32,
    },
}

/// A [`GraphicsContext`] that draws nothing and records every call, for testing code that
/// renders. Compilation and linking succeed unless told otherwise.
#[derive(Default)]
pub struct RecordingContext {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    /// Stage of every shader object, by id.
    stages: RefCell<HashMap<u32, ShaderStage>>,
    /// Contents of every buffer, by id.
    buffer_data: RefCell<Vec<(u32, Vec<f32>)>>,
    bound_buffer: Cell<Option<u32>>,
    drawing_buffer_size: Cell<UVec2>,
    compile_failure: RefCell<Option<(ShaderStage, String)>>,
    link_failure: RefCell<Option<String>>,
    hidden_names: RefCell<Vec<String>>,
    fail_allocation: Cell<bool>,
    /// Attribute locations given out, by name.
    attribs: RefCell<Vec<(String, u32)>>,
    /// Locations requested with `bind_attrib_location`, applied at link.
    pending_attribs: RefCell<Vec<(String, u32)>>,
}

impl RecordingContext {
    /// Creates a context with a drawing buffer of `size`.
    pub fn with_size(size: UVec2) -> Self {
        let ret = Self::default();
        ret.set_drawing_buffer_size(size);
        ret
    }

    /// Changes the drawing buffer size, like resizing the canvas would.
    pub fn set_drawing_buffer_size(&self, size: UVec2) {
        self.drawing_buffer_size.set(size);
    }

    /// Makes every `stage` shader fail to compile with `log`.
    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        *self.compile_failure.borrow_mut() = Some((stage, log.to_owned()));
    }

    /// Makes every program fail to link with `log`.
    pub fn fail_link(&self, log: &str) {
        *self.link_failure.borrow_mut() = Some(log.to_owned());
    }

    /// Makes an attribute or uniform unresolvable.
    pub fn hide_name(&self, name: &str) {
        self.hidden_names.borrow_mut().push(name.to_owned());
    }

    /// Makes every create_* call return [`None`].
    pub fn fail_allocation(&self, fail: bool) {
        self.fail_allocation.set(fail);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Forgets every call so far (but not buffer contents).
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// Every draw call so far.
    pub fn draws(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::DrawArrays { .. }))
            .cloned()
            .collect()
    }

    /// Contents of every buffer, in creation order.
    pub fn buffers(&self) -> Vec<Vec<f32>> {
        self.buffer_data
            .borrow()
            .iter()
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// Every matrix uploaded to the uniform `name`, in order.
    pub fn uniform_matrices(&self, name: &str) -> Vec<[f32; 16]> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::UniformMatrix4fv { name: n, data, .. } if n == name => Some(*data),
                _ => None,
            })
            .collect()
    }

    /// Location that was given to attribute `name`.
    pub fn attrib_location_of(&self, name: &str) -> Option<u32> {
        self.attribs
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, location)| location)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> Option<u32> {
        if self.fail_allocation.get() {
            return None;
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Some(id)
    }

    fn hidden(&self, name: &str) -> bool {
        self.hidden_names.borrow().iter().any(|n| n == name)
    }
}

impl GraphicsContext for RecordingContext {
    type Buffer = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn drawing_buffer_size(&self) -> UVec2 {
        self.drawing_buffer_size.get()
    }

    fn create_buffer(&self) -> Option<u32> {
        let id = self.allocate()?;
        self.buffer_data.borrow_mut().push((id, Vec::new()));
        self.record(Call::CreateBuffer(id));
        Some(id)
    }

    fn bind_array_buffer(&self, buffer: Option<&u32>) {
        self.bound_buffer.set(buffer.copied());
        self.record(Call::BindArrayBuffer(buffer.copied()));
    }

    fn buffer_static_data(&self, data: &[f32]) {
        if let Some(bound) = self.bound_buffer.get() {
            if let Some((_, contents)) = self
                .buffer_data
                .borrow_mut()
                .iter_mut()
                .find(|(id, _)| *id == bound)
            {
                *contents = data.to_vec();
            }
        }
        self.record(Call::BufferStaticData(data.to_vec()));
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        let id = self.allocate()?;
        self.stages.borrow_mut().insert(id, stage);
        self.record(Call::CreateShader { id, stage });
        Some(id)
    }

    fn shader_source(&self, shader: &u32, _source: &str) {
        self.record(Call::ShaderSource(*shader));
    }

    fn compile_shader(&self, shader: &u32) {
        self.record(Call::CompileShader(*shader));
    }

    fn shader_compile_status(&self, shader: &u32) -> bool {
        let stage = self.stages.borrow().get(shader).copied();
        !matches!(&*self.compile_failure.borrow(), Some((s, _)) if Some(*s) == stage)
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        let stage = self.stages.borrow().get(shader).copied();
        match &*self.compile_failure.borrow() {
            Some((s, log)) if Some(*s) == stage => Some(log.clone()),
            _ => Some(String::new()),
        }
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Option<u32> {
        let id = self.allocate()?;
        self.record(Call::CreateProgram(id));
        Some(id)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        self.record(Call::AttachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn detach_shader(&self, program: &u32, shader: &u32) {
        self.record(Call::DetachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn bind_attrib_location(&self, program: &u32, index: u32, name: &str) {
        self.pending_attribs
            .borrow_mut()
            .push((name.to_owned(), index));
        self.record(Call::BindAttribLocation {
            program: *program,
            index,
            name: name.to_owned(),
        });
    }

    fn link_program(&self, program: &u32) {
        let mut attribs = self.attribs.borrow_mut();
        for (name, location) in self.pending_attribs.borrow_mut().drain(..) {
            attribs.retain(|(n, _)| *n != name);
            attribs.push((name, location));
        }
        self.record(Call::LinkProgram(*program));
    }

    fn program_link_status(&self, _program: &u32) -> bool {
        self.link_failure.borrow().is_none()
    }

    fn program_info_log(&self, _program: &u32) -> Option<String> {
        Some(self.link_failure.borrow().clone().unwrap_or_default())
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
    }

    fn attrib_location(&self, _program: &u32, name: &str) -> Option<u32> {
        if self.hidden(name) {
            return None;
        }
        let mut attribs = self.attribs.borrow_mut();
        if let Some(&(_, location)) = attribs.iter().find(|(n, _)| n == name) {
            return Some(location);
        }
        // Unbound attributes get the lowest free location, like a linker would choose.
        let location = (0..)
            .find(|l| attribs.iter().all(|(_, taken)| taken != l))
            .unwrap_or_default();
        attribs.push((name.to_owned(), location));
        Some(location)
    }

    fn uniform_location(&self, _program: &u32, name: &str) -> Option<String> {
        (!self.hidden(name)).then(|| name.to_owned())
    }

    fn use_program(&self, program: Option<&u32>) {
        self.record(Call::UseProgram(program.copied()));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            size,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn uniform_matrix4fv(&self, location: &String, transpose: bool, data: &[f32; 16]) {
        self.record(Call::UniformMatrix4fv {
            name: location.clone(),
            transpose,
            data: *data,
        });
    }

    fn viewport(&self, size: UVec2) {
        self.record(Call::Viewport(size));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(Call::ClearDepth(depth));
    }

    fn clear(&self, buffers: ClearBuffers) {
        self.record(Call::Clear(buffers));
    }

    fn enable_depth_test(&self) {
        self.record(Call::EnableDepthTest);
    }

    fn depth_func(&self, func: DepthFunc) {
        self.record(Call::DepthFunc(func));
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.record(Call::DrawArrays {
            primitive,
            first,
            count,
        });
    }
}
