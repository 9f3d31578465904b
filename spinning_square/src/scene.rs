// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::square::Square;
use glam::Vec4;
use renderer::{GraphicsContext, Primitive, Renderer, RendererError, Shader, ShaderInterface};
use renderer3d::Camera3d;

/// Per-vertex position attribute.
pub const VERTEX_POSITION: &str = "aVertexPosition";
/// Per-vertex color attribute.
pub const VERTEX_COLOR: &str = "aVertexColor";

// Attribute locations are their index in the interface.
const VERTEX_POSITION_LOCATION: u32 = 0;
const VERTEX_COLOR_LOCATION: u32 = 1;

const INTERFACE: ShaderInterface = ShaderInterface {
    attributes: &[VERTEX_POSITION, VERTEX_COLOR],
    uniforms: &[Camera3d::PROJECTION_UNIFORM, Camera3d::MODEL_VIEW_UNIFORM],
};

/// The shader program and the geometry it draws. Exactly one exists per [`Renderer`].
pub struct Scene<G: GraphicsContext> {
    shader: Shader<G>,
    square: Square<G>,
    background: Vec4,
}

impl<G: GraphicsContext> Scene<G> {
    /// Compiles the shader and uploads the square. Any failure is fatal.
    pub fn new(renderer: &Renderer<G>, background: Vec4) -> Result<Self, RendererError> {
        let shader = renderer.create_shader(
            include_str!("shaders/square.vert"),
            include_str!("shaders/square.frag"),
            &INTERFACE,
        )?;
        let square = Square::new(renderer)?;

        Ok(Self {
            shader,
            square,
            background,
        })
    }

    /// Clears the last frame and draws the square once as seen by `camera`.
    pub fn draw(&self, renderer: &Renderer<G>, camera: &Camera3d) {
        renderer.set_background_color(self.background);
        Camera3d::init(renderer);
        renderer.begin();

        self.square
            .positions
            .bind(renderer)
            .bind_attrib(VERTEX_POSITION_LOCATION);
        self.square
            .colors
            .bind(renderer)
            .bind_attrib(VERTEX_COLOR_LOCATION);

        let shader = self.shader.bind(renderer);
        camera.prepare(&shader);
        shader.draw_arrays(
            Primitive::TriangleStrip,
            0,
            self.square.vertex_count() as i32,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::{Scene, VERTEX_COLOR, VERTEX_POSITION};
    use glam::{uvec2, vec3, vec4, Mat4};
    use renderer::{
        Call, ClearBuffers, DepthFunc, Primitive, RecordingContext, Renderer, RendererError,
        ShaderError, ShaderStage,
    };
    use renderer3d::{Camera3d, Perspective};

    fn renderer() -> Renderer<RecordingContext> {
        Renderer::with_context(RecordingContext::with_size(uvec2(800, 600)))
    }

    #[test]
    fn draw_frame() {
        let renderer = renderer();
        let scene = Scene::new(&renderer, vec4(0.0, 0.0, 0.0, 1.0)).unwrap();
        let gl = renderer.context();
        gl.clear_calls();

        let camera = Camera3d::new(
            Mat4::from_translation(vec3(0.0, 0.0, -6.0)),
            Perspective::default(),
        );
        scene.draw(&renderer, &camera);

        let calls = gl.calls();
        // Buffers feed the locations the shader's attributes were bound to.
        let position = gl.attrib_location_of(VERTEX_POSITION).unwrap();
        let color = gl.attrib_location_of(VERTEX_COLOR).unwrap();
        assert_eq!((position, color), (0, 1));
        for expected in [
            Call::ClearColor([0.0, 0.0, 0.0, 1.0]),
            Call::ClearDepth(1.0),
            Call::EnableDepthTest,
            Call::DepthFunc(DepthFunc::LessEqual),
            Call::Viewport(uvec2(800, 600)),
            Call::Clear(ClearBuffers::COLOR_AND_DEPTH),
            Call::VertexAttribPointer {
                index: position,
                size: 2,
                normalized: false,
                stride: 0,
                offset: 0,
            },
            Call::EnableVertexAttribArray(position),
            Call::VertexAttribPointer {
                index: color,
                size: 4,
                normalized: false,
                stride: 0,
                offset: 0,
            },
            Call::EnableVertexAttribArray(color),
        ] {
            assert!(calls.contains(&expected), "missing {expected:?}");
        }

        // Uniforms go in column-major without transposing.
        assert!(calls.iter().all(|c| !matches!(
            c,
            Call::UniformMatrix4fv {
                transpose: true,
                ..
            }
        )));
        assert_eq!(
            gl.uniform_matrices(Camera3d::MODEL_VIEW_UNIFORM),
            vec![camera.model_view_matrix.to_cols_array()]
        );
        assert_eq!(
            gl.draws(),
            vec![Call::DrawArrays {
                primitive: Primitive::TriangleStrip,
                first: 0,
                count: 4,
            }]
        );

        // The draw comes last, after the program is in use.
        let draw = calls
            .iter()
            .position(|c| matches!(c, Call::DrawArrays { .. }))
            .unwrap();
        let use_program = calls
            .iter()
            .position(|c| matches!(c, Call::UseProgram(Some(_))))
            .unwrap();
        assert!(use_program < draw);
    }

    #[test]
    fn fatal_startup() {
        let renderer = renderer();
        renderer
            .context()
            .fail_compile(ShaderStage::Vertex, "'aVertexPosition' : syntax error");
        assert!(matches!(
            Scene::new(&renderer, vec4(0.0, 0.0, 0.0, 1.0)),
            Err(RendererError::Shader(ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }))
        ));

        let renderer = self::renderer();
        renderer.context().fail_link("link failed");
        assert!(matches!(
            Scene::new(&renderer, vec4(0.0, 0.0, 0.0, 1.0)),
            Err(RendererError::Shader(ShaderError::Link { .. }))
        ));

        let renderer = self::renderer();
        renderer.context().hide_name(Camera3d::PROJECTION_UNIFORM);
        assert!(matches!(
            Scene::new(&renderer, vec4(0.0, 0.0, 0.0, 1.0)),
            Err(RendererError::Shader(ShaderError::MissingUniform(
                "uProjectionMatrix"
            )))
        ));
        // No geometry is uploaded for a program that doesn't exist.
        assert!(renderer.context().buffers().is_empty());

        let renderer = self::renderer();
        renderer.context().hide_name(VERTEX_COLOR);
        assert!(matches!(
            Scene::new(&renderer, vec4(0.0, 0.0, 0.0, 1.0)),
            Err(RendererError::Shader(ShaderError::MissingAttribute(
                "aVertexColor"
            )))
        ));
    }
}
