// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "renderer3d"]

//! # Renderer3D
//!
//! [`renderer3d`][`crate`] is an add-on to [`renderer`] that provides a [`Camera3d`] and the
//! [`Projection`]s it can be built from.

mod camera_3d;

// Re-export to provide a simpler api.
pub use camera_3d::*;
