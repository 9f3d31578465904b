// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::{GraphicsContext, Primitive, ShaderStage};
use crate::error::{trim_log, ShaderError};
use crate::gl::Gl;
use crate::renderer::Renderer;
use glam::Mat4;
use linear_map::LinearMap;
use std::rc::Rc;

/// Names of the attributes and uniforms a [`Shader`] must expose. Each one is resolved when the
/// shader is created, and a missing one fails creation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderInterface {
    /// Per-vertex inputs. Each is bound to its index in this list, so locations are known
    /// before the shader exists.
    pub attributes: &'static [&'static str],
    /// Per-draw inputs.
    pub uniforms: &'static [&'static str],
}

/// References a linked glsl program. As cheap to clone as an [`Rc`].
pub struct Shader<G: GraphicsContext = Gl>(Rc<ShaderInner<G>>);

impl<G: GraphicsContext> Clone for Shader<G> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

struct ShaderInner<G: GraphicsContext> {
    program: G::Program,
    // Use a LinearMap because there are relatively few uniforms.
    uniforms: LinearMap<&'static str, G::UniformLocation>,
}

impl<G: GraphicsContext> Shader<G> {
    /// Compiles and links a new glsl shader from sources, then resolves every name in
    /// `interface`. The stage objects are released once linked.
    pub fn new(
        renderer: &Renderer<G>,
        vertex: &str,
        fragment: &str,
        interface: &ShaderInterface,
    ) -> Result<Self, ShaderError> {
        let gl = &renderer.gl;
        let vert_shader = compile_shader(gl, ShaderStage::Vertex, vertex)?;
        let frag_shader = match compile_shader(gl, ShaderStage::Fragment, fragment) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(&vert_shader);
                return Err(e);
            }
        };

        let program = link_program(gl, &vert_shader, &frag_shader, interface.attributes);
        gl.delete_shader(&vert_shader);
        gl.delete_shader(&frag_shader);
        let program = program?;

        match resolve(gl, &program, interface) {
            Ok(uniforms) => Ok(Self(Rc::new(ShaderInner { program, uniforms }))),
            Err(e) => {
                gl.delete_program(&program);
                Err(e)
            }
        }
    }

    /// Binds the shader for handling subsequent draw calls.
    pub fn bind<'a>(&'a self, renderer: &'a Renderer<G>) -> ShaderBinding<'a, G> {
        ShaderBinding::new(&renderer.gl, &self.0)
    }
}

/// A bound [`Shader`] that you can draw with.
pub struct ShaderBinding<'a, G: GraphicsContext> {
    gl: &'a G,
    shader: &'a ShaderInner<G>,
}

impl<'a, G: GraphicsContext> ShaderBinding<'a, G> {
    fn new(gl: &'a G, shader: &'a ShaderInner<G>) -> Self {
        gl.use_program(Some(&shader.program));
        Self { gl, shader }
    }

    /// Sets a `mat4` uniform (column-major, not transposed).
    pub fn uniform_matrix4f(&self, name: &'static str, m: &Mat4) {
        if let Some(u) = self.shader.uniforms.get(name) {
            self.gl.uniform_matrix4fv(u, false, &m.to_cols_array());
        } else {
            log::warn!("uniform {} is not in the shader interface", name);
        }
    }

    /// Draws `count` vertices starting at `first` from the bound attributes.
    pub fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.gl.draw_arrays(primitive, first, count);
    }
}

impl<'a, G: GraphicsContext> Drop for ShaderBinding<'a, G> {
    fn drop(&mut self) {
        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        self.gl.use_program(None);
    }
}

/// Checks every attribute in `interface` is active at its bound location and looks up every
/// uniform, failing on the first missing one.
fn resolve<G: GraphicsContext>(
    gl: &G,
    program: &G::Program,
    interface: &ShaderInterface,
) -> Result<LinearMap<&'static str, G::UniformLocation>, ShaderError> {
    for (location, &name) in interface.attributes.iter().enumerate() {
        if gl.attrib_location(program, name) != Some(location as u32) {
            return Err(ShaderError::MissingAttribute(name));
        }
    }

    let mut uniforms = LinearMap::with_capacity(interface.uniforms.len());
    for &name in interface.uniforms {
        let location = gl
            .uniform_location(program, name)
            .ok_or(ShaderError::MissingUniform(name))?;
        uniforms.insert(name, location);
    }
    Ok(uniforms)
}

/// compile_shader compiles either the vertex or fragment shader of a shader program.
fn compile_shader<G: GraphicsContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .ok_or(ShaderError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.shader_compile_status(&shader) {
        Ok(shader)
    } else {
        let log = trim_log(gl.shader_info_log(&shader));
        gl.delete_shader(&shader);
        Err(ShaderError::Compile { stage, log })
    }
}

/// link_program links the two shaders to form a shader program. It indexes attribute locations
/// in the order they are listed. The shaders are detached afterwards, whether or not linking
/// succeeded.
fn link_program<G: GraphicsContext>(
    gl: &G,
    vert_shader: &G::Shader,
    frag_shader: &G::Shader,
    attributes: &[&str],
) -> Result<G::Program, ShaderError> {
    let program = gl
        .create_program()
        .ok_or(ShaderError::Allocation("program"))?;

    gl.attach_shader(&program, vert_shader);
    gl.attach_shader(&program, frag_shader);
    for (location, name) in attributes.iter().enumerate() {
        gl.bind_attrib_location(&program, location as u32, name);
    }
    gl.link_program(&program);

    let linked = gl.program_link_status(&program);
    let log = (!linked).then(|| trim_log(gl.program_info_log(&program)));

    gl.detach_shader(&program, vert_shader);
    gl.detach_shader(&program, frag_shader);

    match log {
        None => Ok(program),
        Some(log) => {
            gl.delete_program(&program);
            Err(ShaderError::Link { log })
        }
    }
}
