// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use renderer::{GraphicsContext, Renderer, RendererError, StaticBuffer};

/// Corners in triangle strip order: top-left, top-right, bottom-left, bottom-right.
/// Changing the order changes the winding.
pub const POSITIONS: [[f32; 2]; 4] = [[-1.0, 1.0], [1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];

/// RGBA per corner: white, red, green, blue.
pub const COLORS: [[f32; 4]; 4] = [
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

/// The square's vertex data, uploaded once.
pub struct Square<G: GraphicsContext> {
    /// Clip space corners.
    pub positions: StaticBuffer<[f32; 2], G>,
    /// Corner colors.
    pub colors: StaticBuffer<[f32; 4], G>,
}

impl<G: GraphicsContext> Square<G> {
    /// Allocates both buffers and uploads [`POSITIONS`] and [`COLORS`].
    pub fn new(renderer: &Renderer<G>) -> Result<Self, RendererError> {
        Ok(Self {
            positions: StaticBuffer::new(renderer, &POSITIONS)?,
            colors: StaticBuffer::new(renderer, &COLORS)?,
        })
    }

    /// Number of vertices to draw.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len()
    }
}
