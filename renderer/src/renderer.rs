// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::{ClearBuffers, DepthFunc, GraphicsContext};
use crate::error::{RendererError, ShaderError};
use crate::gl::{Gl, GL_NAME, GL_TITLE};
use crate::shader::{Shader, ShaderInterface};
use glam::*;
use js_hooks::error_message;
use linear_map::LinearMap;
use std::cell::{Cell, RefCell};
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// An abstraction over
/// [WebGL](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGlRenderingContext.html)/
/// [WebGL2](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGl2RenderingContext.html)
/// or any other [`GraphicsContext`].
pub struct Renderer<G: GraphicsContext = Gl> {
    /// WebGL context.
    pub(crate) gl: G,
    cached_viewport: Cell<Option<UVec2>>,
    /// Cache of static shaders, keyed by sources and the interface they were resolved against.
    shader_cache: RefCell<LinearMap<(&'static str, &'static str, ShaderInterface), Shader<G>>>,
}

impl Renderer<Gl> {
    /// Creates a new WebGL/WebGL2 renderer drawing to `canvas`.
    pub fn new(canvas: &HtmlCanvasElement, antialias: bool) -> Result<Self, RendererError> {
        let options = js_sys::JSON::parse(&format!(
            r##"{{
            "alpha": true,
            "antialias": {antialias},
            "depth": true,
            "powerPreference": "high-performance",
            "premultipliedAlpha": true,
            "preserveDrawingBuffer": false
        }}"##
        ))
        .map_err(|e| context_error(&e))?;

        // See: https://developer.mozilla.org/en-US/docs/Web/API/HTMLCanvasElement/getContext
        let gl = canvas
            .get_context_with_context_options(GL_NAME, &options)
            .map_err(|e| context_error(&e))?
            .ok_or_else(|| RendererError::ContextUnavailable(format!("{GL_TITLE} unsupported")))?
            .dyn_into::<Gl>()
            .map_err(|_| RendererError::ContextUnavailable(format!("{GL_TITLE} unsupported")))?;

        log::info!("created {} context", GL_TITLE);
        Ok(Self::with_context(gl))
    }
}

fn context_error(e: &wasm_bindgen::JsValue) -> RendererError {
    RendererError::ContextUnavailable(
        error_message(e).unwrap_or_else(|| format!("Error initializing {GL_TITLE}")),
    )
}

impl<G: GraphicsContext> Renderer<G> {
    /// Wraps an existing context.
    pub fn with_context(gl: G) -> Self {
        Self {
            gl,
            cached_viewport: Cell::new(None),
            shader_cache: Default::default(),
        }
    }

    /// The underlying context.
    pub fn context(&self) -> &G {
        &self.gl
    }

    /// Size of the drawing buffer in real pixels. Cached until
    /// [`invalidate_viewport`][`Self::invalidate_viewport`].
    pub fn viewport(&self) -> UVec2 {
        if let Some(size) = self.cached_viewport.get() {
            size
        } else {
            let size = self.gl.drawing_buffer_size();
            self.cached_viewport.set(Some(size));
            size
        }
    }

    /// Forgets the cached viewport, e.g. at the start of a frame since the canvas may have been
    /// resized.
    pub fn invalidate_viewport(&self) {
        self.cached_viewport.set(None);
    }

    /// Creates a new shader from static glsl sources. Only compiles each combination of
    /// sources and [`ShaderInterface`] once. For runtime defined shaders use [`Shader::new`].
    pub fn create_shader(
        &self,
        vertex: &'static str,
        fragment: &'static str,
        interface: &ShaderInterface,
    ) -> Result<Shader<G>, ShaderError> {
        let key = (vertex, fragment, *interface);
        if let Some(shader) = self.shader_cache.borrow().get(&key) {
            return Ok(shader.clone());
        }
        let shader = Shader::new(self, vertex, fragment, interface)?;
        self.shader_cache.borrow_mut().insert(key, shader.clone());
        Ok(shader)
    }

    /// Sets the background color to RGBA with components 0.0-1.0. Takes effect at the next
    /// [`begin`][`Self::begin`].
    pub fn set_background_color(&self, color: Vec4) {
        self.gl.clear_color(color.x, color.y, color.z, color.w);
    }

    /// Enables the depth test. The depth buffer is cleared to the farthest value (`1.0`).
    pub fn set_depth_test(&self, func: DepthFunc) {
        self.gl.clear_depth(1.0);
        self.gl.enable_depth_test();
        self.gl.depth_func(func);
    }

    /// Sets viewport and clears last frame's color and depth.
    pub fn begin(&self) {
        self.gl.viewport(self.viewport());
        self.gl.clear(ClearBuffers::COLOR_AND_DEPTH);
    }
}

/// Converts a viewport to an aspect ratio (width / height), or [`None`] if it has no area.
pub fn viewport_to_aspect(viewport: UVec2) -> Option<f32> {
    (viewport.x > 0 && viewport.y > 0).then(|| {
        let [width, height] = viewport.as_vec2().to_array();
        width / height
    })
}

#[cfg(test)]
mod tests {
    use crate::context::{ClearBuffers, DepthFunc};
    use crate::recording::{Call, RecordingContext};
    use crate::renderer::{viewport_to_aspect, Renderer};
    use crate::error::ShaderError;
    use crate::shader::ShaderInterface;
    use glam::{uvec2, vec4};

    #[test]
    fn aspect() {
        assert_eq!(viewport_to_aspect(uvec2(800, 600)), Some(800.0 / 600.0));
        assert_eq!(viewport_to_aspect(uvec2(800, 0)), None);
        assert_eq!(viewport_to_aspect(uvec2(0, 600)), None);
    }

    #[test]
    fn viewport_cache() {
        let renderer = Renderer::with_context(RecordingContext::default());
        renderer.context().set_drawing_buffer_size(uvec2(10, 20));
        assert_eq!(renderer.viewport(), uvec2(10, 20));

        renderer.context().set_drawing_buffer_size(uvec2(30, 40));
        assert_eq!(renderer.viewport(), uvec2(10, 20));
        renderer.invalidate_viewport();
        assert_eq!(renderer.viewport(), uvec2(30, 40));
    }

    #[test]
    fn shader_cache() {
        let renderer = Renderer::with_context(RecordingContext::default());
        let interface = ShaderInterface::default();
        renderer.create_shader("vs", "fs", &interface).unwrap();
        renderer.create_shader("vs", "fs", &interface).unwrap();
        assert_eq!(
            renderer
                .context()
                .count(|c| matches!(c, Call::CreateProgram(_))),
            1
        );
    }

    #[test]
    fn shader_cache_checks_interface() {
        let renderer = Renderer::with_context(RecordingContext::default());
        renderer.context().hide_name("uMissing");
        renderer
            .create_shader("vs", "fs", &ShaderInterface::default())
            .unwrap();

        // Same sources, but a required uniform the program doesn't have.
        let stricter = ShaderInterface {
            attributes: &[],
            uniforms: &["uMissing"],
        };
        assert!(matches!(
            renderer.create_shader("vs", "fs", &stricter),
            Err(ShaderError::MissingUniform("uMissing"))
        ));
        // Nothing broken was cached.
        assert!(renderer.create_shader("vs", "fs", &stricter).is_err());
        assert!(renderer
            .create_shader("vs", "fs", &ShaderInterface::default())
            .is_ok());
        assert_eq!(
            renderer
                .context()
                .count(|c| matches!(c, Call::CreateProgram(_))),
            3
        );
    }

    #[test]
    fn clear() {
        let renderer = Renderer::with_context(RecordingContext::default());
        renderer.context().set_drawing_buffer_size(uvec2(4, 3));
        renderer.set_background_color(vec4(0.0, 0.0, 0.0, 1.0));
        renderer.set_depth_test(DepthFunc::LessEqual);
        renderer.begin();
        assert_eq!(
            renderer.context().calls(),
            vec![
                Call::ClearColor([0.0, 0.0, 0.0, 1.0]),
                Call::ClearDepth(1.0),
                Call::EnableDepthTest,
                Call::DepthFunc(DepthFunc::LessEqual),
                Call::Viewport(uvec2(4, 3)),
                Call::Clear(ClearBuffers::COLOR_AND_DEPTH),
            ]
        );
    }
}
