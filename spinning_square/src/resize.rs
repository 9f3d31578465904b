// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use gloo_events::EventListener;
use js_hooks::{window, window_inner_size};
use web_sys::HtmlCanvasElement;

/// Keeps a canvas the size of the window. The next frame picks up the new drawing buffer size,
/// nothing else is rebuilt.
pub struct CanvasResizer {
    _listener: EventListener,
}

impl CanvasResizer {
    /// Fits `canvas` to the window now and after every window `resize` event, until dropped.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        fit_to_window(&canvas)?;
        let window = window()?;
        let listener = EventListener::new(&window, "resize", move |_event| {
            if let Err(e) = fit_to_window(&canvas) {
                log::warn!("could not resize canvas: {}", e);
            }
        });
        Ok(Self {
            _listener: listener,
        })
    }
}

fn fit_to_window(canvas: &HtmlCanvasElement) -> Result<(), String> {
    let current = (canvas.width(), canvas.height());
    if let Some((width, height)) = resize_to(current, window_inner_size()?) {
        log::info!("resizing canvas to {}x{}", width, height);
        canvas.set_width(width);
        canvas.set_height(height);
    }
    Ok(())
}

/// The size to set, or [`None`] if the canvas already fits. Setting a canvas dimension clears
/// its drawing buffer even if the value is unchanged.
fn resize_to(current: (u32, u32), window: (u32, u32)) -> Option<(u32, u32)> {
    (current != window).then_some(window)
}

#[cfg(test)]
mod tests {
    use crate::resize::resize_to;

    #[test]
    fn resize_only_on_change() {
        assert_eq!(resize_to((300, 150), (1280, 720)), Some((1280, 720)));
        assert_eq!(resize_to((1280, 720), (1280, 720)), None);
        assert_eq!(resize_to((1280, 720), (1280, 0)), Some((1280, 0)));
    }
}
