// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Aliases either WebGlRenderingContext or WebGl2RenderingContext to Gl, so the rest of the
//! crate is written once. Only the subset of the api both share is used.

pub use gl::Gl;
pub(crate) use gl::{GL_NAME, GL_TITLE};

#[cfg(not(feature = "webgl2"))]
#[allow(clippy::module_inception)]
mod gl {
    /// The WebGL rendering context.
    pub type Gl = web_sys::WebGlRenderingContext;

    /// Name of context for get_context call.
    pub(crate) const GL_NAME: &str = "webgl";
    pub(crate) const GL_TITLE: &str = "WebGL";
}

#[cfg(feature = "webgl2")]
#[allow(clippy::module_inception)]
mod gl {
    /// The WebGL2 rendering context.
    pub type Gl = web_sys::WebGl2RenderingContext;

    pub(crate) const GL_NAME: &str = "webgl2";
    pub(crate) const GL_TITLE: &str = "WebGL2";
}
