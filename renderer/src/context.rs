// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::gl::Gl;
use glam::UVec2;
use std::fmt;
use web_sys::{WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation};

/// A stage of a [`Shader`][`crate::Shader`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShaderStage {
    /// Runs once per vertex.
    Vertex,
    /// Runs once per fragment.
    Fragment,
}

impl ShaderStage {
    pub(crate) const fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => Gl::VERTEX_SHADER,
            Self::Fragment => Gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// How vertices are assembled into primitives by a draw call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Primitive {
    /// Every 3 vertices form a triangle.
    Triangles,
    /// Every vertex after the first 2 forms a triangle with the previous 2.
    TriangleStrip,
}

impl Primitive {
    pub(crate) const fn gl_enum(self) -> u32 {
        match self {
            Self::Triangles => Gl::TRIANGLES,
            Self::TriangleStrip => Gl::TRIANGLE_STRIP,
        }
    }
}

/// When an incoming fragment passes the depth test.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DepthFunc {
    /// Incoming depth < stored depth.
    Less,
    /// Incoming depth <= stored depth.
    LessEqual,
}

impl DepthFunc {
    pub(crate) const fn gl_enum(self) -> u32 {
        match self {
            Self::Less => Gl::LESS,
            Self::LessEqual => Gl::LEQUAL,
        }
    }
}

/// Which buffers [`GraphicsContext::clear`] resets.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ClearBuffers {
    /// Reset to the clear color.
    pub color: bool,
    /// Reset to the clear depth.
    pub depth: bool,
}

impl ClearBuffers {
    /// Both the color and the depth buffer.
    pub const COLOR_AND_DEPTH: Self = Self {
        color: true,
        depth: true,
    };

    pub(crate) fn gl_mask(self) -> u32 {
        let mut mask = 0;
        if self.color {
            mask |= Gl::COLOR_BUFFER_BIT;
        }
        if self.depth {
            mask |= Gl::DEPTH_BUFFER_BIT;
        }
        mask
    }
}

/// The subset of a WebGL context that [`Renderer`][`crate::Renderer`] needs. Implemented by
/// [`Gl`] and, for tests, by `RecordingContext`.
///
/// Handles are the context's own objects. Creation methods return [`None`] when the context
/// can't allocate (e.g. it was lost).
pub trait GraphicsContext {
    /// Vertex buffer object.
    type Buffer;
    /// A single compiled shader stage.
    type Shader;
    /// A linked program.
    type Program;
    /// Location of a uniform in a linked program.
    type UniformLocation;

    /// Size of the drawing buffer in real pixels.
    fn drawing_buffer_size(&self) -> UVec2;

    /// `createBuffer`.
    fn create_buffer(&self) -> Option<Self::Buffer>;
    /// `bindBuffer(ARRAY_BUFFER, buffer)`.
    fn bind_array_buffer(&self, buffer: Option<&Self::Buffer>);
    /// `bufferData(ARRAY_BUFFER, data, STATIC_DRAW)` on the bound array buffer.
    fn buffer_static_data(&self, data: &[f32]);

    /// `createShader`.
    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    /// `shaderSource`.
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    /// `compileShader`.
    fn compile_shader(&self, shader: &Self::Shader);
    /// `getShaderParameter(shader, COMPILE_STATUS)`.
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    /// `getShaderInfoLog`.
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    /// `deleteShader`.
    fn delete_shader(&self, shader: &Self::Shader);

    /// `createProgram`.
    fn create_program(&self) -> Option<Self::Program>;
    /// `attachShader`.
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    /// `detachShader`.
    fn detach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    /// `bindAttribLocation`. Only takes effect at the next link.
    fn bind_attrib_location(&self, program: &Self::Program, index: u32, name: &str);
    /// `linkProgram`.
    fn link_program(&self, program: &Self::Program);
    /// `getProgramParameter(program, LINK_STATUS)`.
    fn program_link_status(&self, program: &Self::Program) -> bool;
    /// `getProgramInfoLog`.
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    /// `deleteProgram`.
    fn delete_program(&self, program: &Self::Program);
    /// `getAttribLocation`, [`None`] instead of `-1`.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    /// `getUniformLocation`.
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// `useProgram`.
    fn use_program(&self, program: Option<&Self::Program>);

    /// `vertexAttribPointer(index, size, FLOAT, normalized, stride, offset)`.
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    /// `enableVertexAttribArray`.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// `uniformMatrix4fv`. `data` is column-major.
    fn uniform_matrix4fv(
        &self,
        location: &Self::UniformLocation,
        transpose: bool,
        data: &[f32; 16],
    );

    /// `viewport(0, 0, size.x, size.y)`.
    fn viewport(&self, size: UVec2);
    /// `clearColor`.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// `clearDepth`.
    fn clear_depth(&self, depth: f32);
    /// `clear`.
    fn clear(&self, buffers: ClearBuffers);
    /// `enable(DEPTH_TEST)`.
    fn enable_depth_test(&self);
    /// `depthFunc`.
    fn depth_func(&self, func: DepthFunc);
    /// `drawArrays`.
    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32);
}

impl GraphicsContext for Gl {
    type Buffer = WebGlBuffer;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type UniformLocation = WebGlUniformLocation;

    fn drawing_buffer_size(&self) -> UVec2 {
        UVec2::new(
            self.drawing_buffer_width().max(0) as u32,
            self.drawing_buffer_height().max(0) as u32,
        )
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        Gl::create_buffer(self)
    }

    fn bind_array_buffer(&self, buffer: Option<&WebGlBuffer>) {
        self.bind_buffer(Gl::ARRAY_BUFFER, buffer);
    }

    fn buffer_static_data(&self, data: &[f32]) {
        // Safety: the view must not outlive `data` and nothing may allocate in WASM memory
        // while it exists, since that could move the buffer it points into.
        unsafe {
            let view = js_sys::Float32Array::view(data);
            self.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        Gl::create_shader(self, stage.gl_enum())
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        Gl::shader_source(self, shader, source)
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        Gl::compile_shader(self, shader)
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.get_shader_info_log(shader)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        Gl::delete_shader(self, Some(shader))
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        Gl::create_program(self)
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        Gl::attach_shader(self, program, shader)
    }

    fn detach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        Gl::detach_shader(self, program, shader)
    }

    fn bind_attrib_location(&self, program: &WebGlProgram, index: u32, name: &str) {
        Gl::bind_attrib_location(self, program, index, name)
    }

    fn link_program(&self, program: &WebGlProgram) {
        Gl::link_program(self, program)
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.get_program_info_log(program)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        Gl::delete_program(self, Some(program))
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        u32::try_from(self.get_attrib_location(program, name)).ok()
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        Gl::use_program(self, program)
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.vertex_attrib_pointer_with_i32(index, size, Gl::FLOAT, normalized, stride, offset)
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        Gl::enable_vertex_attrib_array(self, index)
    }

    fn uniform_matrix4fv(
        &self,
        location: &WebGlUniformLocation,
        transpose: bool,
        data: &[f32; 16],
    ) {
        self.uniform_matrix4fv_with_f32_array(Some(location), transpose, data)
    }

    fn viewport(&self, size: UVec2) {
        let size = size.as_ivec2();
        Gl::viewport(self, 0, 0, size.x, size.y)
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        Gl::clear_color(self, r, g, b, a)
    }

    fn clear_depth(&self, depth: f32) {
        Gl::clear_depth(self, depth)
    }

    fn clear(&self, buffers: ClearBuffers) {
        Gl::clear(self, buffers.gl_mask())
    }

    fn enable_depth_test(&self) {
        self.enable(Gl::DEPTH_TEST)
    }

    fn depth_func(&self, func: DepthFunc) {
        Gl::depth_func(self, func.gl_enum())
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        Gl::draw_arrays(self, primitive.gl_enum(), first, count)
    }
}
