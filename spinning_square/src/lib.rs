// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "spinning_square"]

//! # Spinning Square
//!
//! Draws a square with a different color at each corner, spinning about its center, to a
//! window-sized `<canvas id="glCanvas">` until the page is closed.

mod config;
mod frame_loop;
mod resize;
mod rig;
mod scene;
mod scheduler;
mod square;

pub use config::*;
pub use frame_loop::*;
pub use resize::*;
pub use rig::*;
pub use scene::*;
pub use scheduler::*;
pub use square::*;

use renderer::{Gl, Renderer, RendererError};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Why the animation couldn't start.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The page is missing something, e.g. the canvas.
    #[error("{0}")]
    Page(String),
    /// WebGL is unavailable or the shaders/buffers couldn't be created.
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Everything that must stay alive while the page is open.
struct App {
    _resizer: CanvasResizer,
    _animation: Rc<RefCell<Animation<Gl, BrowserScheduler>>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

/// Fits the canvas to the window, initializes WebGL, and starts requesting frames. Nothing is
/// drawn and no frame is requested if this fails.
pub fn launch(config: Config) -> Result<(), LaunchError> {
    let canvas = js_hooks::canvas(config.canvas_id).map_err(LaunchError::Page)?;
    let resizer = CanvasResizer::new(canvas.clone()).map_err(LaunchError::Page)?;
    let renderer = Renderer::new(&canvas, config.antialias)?;
    let frame_loop = FrameLoop::new(renderer, &config)?;
    let animation = animate(frame_loop, BrowserScheduler);

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            _resizer: resizer,
            _animation: animation,
        })
    });
    Ok(())
}

/// Entry point, called by the host page once the module is instantiated.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    let config = Config::default();
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed.
    let _ = console_log::init_with_level(config.log_level);

    if let Err(e) = launch(config) {
        log::error!("failed to start: {}", e);
        js_hooks::alert(&e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use crate::LaunchError;
    use renderer::{RendererError, ShaderError};

    #[test]
    fn launch_error_display() {
        assert_eq!(
            LaunchError::Page("no canvas with id \"glCanvas\"".to_owned()).to_string(),
            "no canvas with id \"glCanvas\""
        );
        assert_eq!(
            LaunchError::from(RendererError::Shader(ShaderError::Link {
                log: "bad".to_owned()
            }))
            .to_string(),
            "shader program failed to link: bad"
        );
        // What the alert says when the browser has no WebGL.
        assert_eq!(
            LaunchError::from(RendererError::ContextUnavailable(
                "WebGL unsupported".to_owned()
            ))
            .to_string(),
            "WebGL unsupported"
        );
    }
}
