// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::{vec3, vec4, Vec3, Vec4};
use renderer3d::Perspective;

/// Settings that are fixed for the lifetime of the page.
#[derive(Clone, Debug)]
pub struct Config {
    /// Element id of the canvas to draw to.
    pub canvas_id: &'static str,
    /// Ask the browser for a multisampled drawing buffer.
    pub antialias: bool,
    /// Field of view and clip planes. `aspect` is replaced every frame.
    pub perspective: Perspective,
    /// Where the square sits relative to the camera.
    pub camera_offset: Vec3,
    /// RGBA clear color.
    pub background: Vec4,
    /// Most verbose level sent to the browser console.
    pub log_level: log::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_id: "glCanvas",
            antialias: true,
            perspective: Perspective {
                fov: 45.0,
                z_near: 0.1,
                z_far: 100.0,
                ..Perspective::default()
            },
            camera_offset: vec3(0.0, 0.0, -6.0),
            background: vec4(0.0, 0.0, 0.0, 1.0),
            log_level: log::Level::Info,
        }
    }
}
