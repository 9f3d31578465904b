// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::GraphicsContext;
use crate::error::RendererError;
use crate::gl::Gl;
use crate::renderer::Renderer;
use crate::vertex::Vertex;
use std::convert::TryInto;
use std::marker::PhantomData;

/// A GPU buffer of one tightly packed [`Vertex`] attribute. Written exactly once by
/// [`StaticBuffer::new`] and never updated.
pub struct StaticBuffer<V, G: GraphicsContext = Gl> {
    elements: G::Buffer,
    length: u32, // The amount of elements in the buffer.
    element: PhantomData<V>,
}

impl<V: Vertex, G: GraphicsContext> StaticBuffer<V, G> {
    /// Allocates a buffer and uploads `elements` to it.
    pub fn new(renderer: &Renderer<G>, elements: &[V]) -> Result<Self, RendererError> {
        let gl = &renderer.gl;
        let length = elements
            .len()
            .try_into()
            .map_err(|_| RendererError::Allocation("buffer larger than u32::MAX elements"))?;
        let buffer = gl
            .create_buffer()
            .ok_or(RendererError::Allocation("vertex buffer"))?;

        gl.bind_array_buffer(Some(&buffer));
        gl.buffer_static_data(bytemuck::cast_slice(elements));

        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        gl.bind_array_buffer(None);

        Ok(Self {
            elements: buffer,
            length,
            element: PhantomData,
        })
    }

    /// Number of vertices in the buffer.
    pub fn len(&self) -> u32 {
        self.length
    }

    /// Returns true if the buffer has no vertices.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Binds the buffer so it can source attributes.
    #[must_use]
    pub fn bind<'a>(&'a self, renderer: &'a Renderer<G>) -> StaticBufferBinding<'a, V, G> {
        StaticBufferBinding::new(&renderer.gl, self)
    }
}

/// A bound [`StaticBuffer`].
pub struct StaticBufferBinding<'a, V, G: GraphicsContext> {
    gl: &'a G,
    element: PhantomData<V>,
}

impl<'a, V: Vertex, G: GraphicsContext> StaticBufferBinding<'a, V, G> {
    fn new(gl: &'a G, buffer: &StaticBuffer<V, G>) -> Self {
        gl.bind_array_buffer(Some(&buffer.elements));
        Self {
            gl,
            element: PhantomData,
        }
    }

    /// Sources the attribute at `location` from this buffer: [`Vertex::FLOATS`] floats per
    /// vertex, not normalized, tightly packed.
    pub fn bind_attrib(&self, location: u32) {
        self.gl
            .vertex_attrib_pointer_f32(location, V::FLOATS, false, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }
}

impl<'a, V, G: GraphicsContext> Drop for StaticBufferBinding<'a, V, G> {
    fn drop(&mut self) {
        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        self.gl.bind_array_buffer(None);
    }
}
