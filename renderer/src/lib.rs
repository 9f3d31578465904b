// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "renderer"]

//! # Renderer
//!
//! [`renderer`][`crate`] is an abstraction over
//! [WebGL](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGlRenderingContext.html)/
//! [WebGL2](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGl2RenderingContext.html)
//! that draws through a [`GraphicsContext`], so the same code can run against a
//! `RecordingContext` in tests.

mod gl;

#[cfg(any(test, feature = "recording"))]
mod recording;

mod buffer;
mod context;
mod error;
mod renderer;
mod shader;
mod vertex;

#[cfg(any(test, feature = "recording"))]
pub use recording::*;

// Re-export to provide a simpler api.
pub use buffer::*;
pub use context::*;
pub use error::*;
pub use gl::Gl;
pub use renderer::*;
pub use shader::*;
pub use vertex::*;
