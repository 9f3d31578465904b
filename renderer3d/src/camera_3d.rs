// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::{Mat4, UVec2};
use renderer::{viewport_to_aspect, DepthFunc, GraphicsContext, Renderer, ShaderBinding};

/// A 3 dimensional camera. It's recommended to create a new one each frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera3d {
    /// The [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix).
    pub projection_matrix: Mat4,
    /// Places the model in front of the camera.
    pub model_view_matrix: Mat4,
}

impl Camera3d {
    /// Name of the `uniform mat4` that receives `projection_matrix`.
    pub const PROJECTION_UNIFORM: &'static str = "uProjectionMatrix";
    /// Name of the `uniform mat4` that receives `model_view_matrix`.
    pub const MODEL_VIEW_UNIFORM: &'static str = "uModelViewMatrix";

    /// Creates a new [`Camera3d`] from a `model_view_matrix` and a [`Projection`].
    pub fn new(model_view_matrix: Mat4, projection: impl Projection) -> Self {
        Self {
            projection_matrix: projection.projection_matrix(),
            model_view_matrix,
        }
    }

    /// Sets `uniform mat4 uProjectionMatrix;` and `uniform mat4 uModelViewMatrix;`.
    pub fn prepare<G: GraphicsContext>(&self, shader: &ShaderBinding<G>) {
        self.debug_assert_valid();
        shader.uniform_matrix4f(Self::PROJECTION_UNIFORM, &self.projection_matrix);
        shader.uniform_matrix4f(Self::MODEL_VIEW_UNIFORM, &self.model_view_matrix);
    }

    /// Nearer fragments win; equal depths let the later draw through.
    pub fn init<G: GraphicsContext>(renderer: &Renderer<G>) {
        renderer.set_depth_test(DepthFunc::LessEqual);
    }

    fn debug_assert_valid(&self) {
        #[cfg(debug_assertions)]
        if self.projection_matrix == Mat4::default() {
            log::warn!("using invalid Camera3d")
        }
    }
}

/// [`Perspective`] projections make objects that are further from the [`Camera3d`] appear smaller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Perspective {
    /// [Aspect ratio](https://en.wikipedia.org/wiki/Aspect_ratio_(image)) of viewport (get with
    /// [`Perspective::with_viewport`]). Defaults to `1.0`.
    pub aspect: f32,
    /// Vertical [field of view](https://en.wikipedia.org/wiki/Field_of_view) in degrees.
    /// Defaults to `45.0`.
    pub fov: f32,
    /// Near [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane in world
    /// space. Defaults to `0.1`.
    pub z_near: f32,
    /// Far [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane in world space.
    /// Defaults to `100.0`.
    pub z_far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fov: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl Perspective {
    /// Sets `aspect` from a viewport. Returns [`None`] if the viewport has no area.
    pub fn with_viewport(self, viewport: UVec2) -> Option<Self> {
        viewport_to_aspect(viewport).map(|aspect| Self { aspect, ..self })
    }
}

impl Projection for Perspective {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.z_near, self.z_far)
    }
}

/// A [`Projection`] defines how objects appear based on their distance to the [`Camera3d`].
pub trait Projection {
    /// Gets the [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix).
    fn projection_matrix(&self) -> Mat4;
}

#[cfg(test)]
mod tests {
    use crate::camera_3d::{Camera3d, Perspective, Projection};
    use glam::{uvec2, vec3, Mat4, Vec4};
    use renderer::{RecordingContext, Renderer, ShaderInterface};

    #[test]
    fn perspective_viewport() {
        let p = Perspective::default().with_viewport(uvec2(1920, 1080)).unwrap();
        assert_eq!(p.aspect, 1920.0 / 1080.0);
        assert_eq!(p.fov, 45.0);
        assert!(Perspective::default().with_viewport(uvec2(1920, 0)).is_none());
    }

    #[test]
    fn perspective_maps_near_and_far() {
        let p = Perspective::default();
        let m = p.projection_matrix();
        // Looking down -z, the near plane maps to ndc z = -1 and the far plane to 1.
        let near = m * Vec4::new(0.0, 0.0, -p.z_near, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -p.z_far, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn prepare() {
        let renderer = Renderer::with_context(RecordingContext::default());
        let interface = ShaderInterface {
            attributes: &[],
            uniforms: &[Camera3d::PROJECTION_UNIFORM, Camera3d::MODEL_VIEW_UNIFORM],
        };
        let shader = renderer.create_shader("vs", "fs", &interface).unwrap();

        let model_view = Mat4::from_translation(vec3(1.0, 2.0, 3.0));
        let camera = Camera3d::new(model_view, Perspective::default());
        camera.prepare(&shader.bind(&renderer));

        let gl = renderer.context();
        assert_eq!(
            gl.uniform_matrices(Camera3d::PROJECTION_UNIFORM),
            vec![Perspective::default().projection_matrix().to_cols_array()]
        );
        assert_eq!(
            gl.uniform_matrices(Camera3d::MODEL_VIEW_UNIFORM),
            vec![model_view.to_cols_array()]
        );
    }
}
