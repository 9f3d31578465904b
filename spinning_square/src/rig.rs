// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::Config;
use glam::{Mat4, UVec2, Vec3};
use renderer3d::{Camera3d, Perspective};
use thiserror::Error;

/// The viewport has no area, so there is no aspect ratio to project with.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("viewport {}x{} has no area", .0.x, .0.y)]
pub struct DegenerateViewport(pub UVec2);

/// Fixed camera looking at a square that spins about its own z axis.
#[derive(Clone, Debug)]
pub struct Rig {
    perspective: Perspective,
    camera_offset: Vec3,
}

impl Rig {
    /// Creates a [`Rig`] from the field of view, clip planes and offset in `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            perspective: config.perspective,
            camera_offset: config.camera_offset,
        }
    }

    /// Projection for `viewport` and model-view for `rotation` (radians). Pure.
    pub fn compute_matrices(
        &self,
        viewport: UVec2,
        rotation: f32,
    ) -> Result<Camera3d, DegenerateViewport> {
        let perspective = self
            .perspective
            .with_viewport(viewport)
            .ok_or(DegenerateViewport(viewport))?;

        // Translate first, then spin the translated frame.
        let model_view =
            Mat4::from_translation(self.camera_offset) * Mat4::from_rotation_z(rotation);
        Ok(Camera3d::new(model_view, perspective))
    }
}
