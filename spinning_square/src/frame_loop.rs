// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::Config;
use crate::rig::{DegenerateViewport, Rig};
use crate::scene::Scene;
use renderer::{GraphicsContext, Renderer, RendererError};
use std::f64::consts::TAU;

/// Tracks time between frames and the square's rotation.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    /// Timestamp of the previous frame in seconds (starts at 0).
    previous: f64,
    /// Radians, unbounded.
    rotation: f64,
}

impl FrameClock {
    /// Advances to `now` (seconds), returning seconds since the previous frame. The first
    /// frame's delta is `now` itself.
    pub fn tick(&mut self, now: f64) -> f64 {
        let delta = now - self.previous;
        self.previous = now;
        self.rotation += delta;
        delta
    }

    /// Total rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation wrapped to `0..TAU`, so precision doesn't degrade on long running pages.
    pub fn angle(&self) -> f32 {
        self.rotation.rem_euclid(TAU) as f32
    }
}

/// Everything needed to draw a frame. [`frame`][`Self::frame`] is called once per display
/// refresh.
pub struct FrameLoop<G: GraphicsContext> {
    renderer: Renderer<G>,
    scene: Scene<G>,
    rig: Rig,
    clock: FrameClock,
}

impl<G: GraphicsContext> FrameLoop<G> {
    /// Compiles shaders and uploads buffers. Nothing is drawn if this fails.
    pub fn new(renderer: Renderer<G>, config: &Config) -> Result<Self, RendererError> {
        let scene = Scene::new(&renderer, config.background)?;
        log::info!("initialized with viewport {}", renderer.viewport());
        Ok(Self {
            renderer,
            scene,
            rig: Rig::new(config),
            clock: FrameClock::default(),
        })
    }

    /// Advances the clock to `time_millis` (the host's frame timestamp) and draws. If the
    /// viewport has no area the clock still advances but nothing is drawn.
    pub fn frame(&mut self, time_millis: f64) -> Result<(), DegenerateViewport> {
        // The canvas may have been resized since last frame.
        self.renderer.invalidate_viewport();
        self.clock.tick(time_millis * 0.001);

        let camera = self
            .rig
            .compute_matrices(self.renderer.viewport(), self.clock.angle())?;
        self.scene.draw(&self.renderer, &camera);
        Ok(())
    }

    /// The [`Renderer`] frames are drawn with.
    pub fn renderer(&self) -> &Renderer<G> {
        &self.renderer
    }

    /// The [`FrameClock`] driving the rotation.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
