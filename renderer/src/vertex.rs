// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use bytemuck::Pod;
use glam::*;

/// A single vertex attribute made of [`prim@f32`]s, stored tightly packed in a
/// [`StaticBuffer`][`crate::StaticBuffer`].
pub trait Vertex: Pod {
    /// How many [`prim@f32`]s make up one vertex (the `size` of `vertexAttribPointer`).
    const FLOATS: i32;
}

macro_rules! impl_vertex_floats {
    ($a: ty, $floats: literal) => {
        impl Vertex for $a {
            const FLOATS: i32 = $floats;
        }
    };
}

impl_vertex_floats!(f32, 1);
impl_vertex_floats!([f32; 2], 2);
impl_vertex_floats!([f32; 3], 3);
impl_vertex_floats!([f32; 4], 4);
impl_vertex_floats!(Vec2, 2);
impl_vertex_floats!(Vec3, 3);

// These are normally 16 byte aligned (breaking Pod) but not with glam's scalar-math feature.
impl_vertex_floats!(Vec4, 4);

#[cfg(test)]
mod tests {
    use crate::vertex::Vertex;
    use glam::{Vec2, Vec4};
    use std::mem::size_of;

    #[test]
    fn tightly_packed() {
        assert_eq!(size_of::<Vec2>(), Vec2::FLOATS as usize * size_of::<f32>());
        assert_eq!(size_of::<Vec4>(), Vec4::FLOATS as usize * size_of::<f32>());
    }
}
