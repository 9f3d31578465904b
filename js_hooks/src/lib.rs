// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "js_hooks"]

//! # Js Hooks
//!
//! [`js_hooks`][`crate`] is a collection of utilities for a WASM application in a JavaScript environment.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

/// Gets the window.
pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "no window".to_owned())
}

/// Gets the document.
pub fn document() -> Result<Document, String> {
    window()?.document().ok_or_else(|| "no document".to_owned())
}

/// Gets the canvas with the element id `id` for use with WebGL.
pub fn canvas(id: &str) -> Result<HtmlCanvasElement, String> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("no canvas with id {id:?}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| format!("element {id:?} is not a canvas"))
}

/// Inner size of the window in CSS pixels, `(width, height)`.
pub fn window_inner_size() -> Result<(u32, u32), String> {
    let w = window()?;
    let dimension = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0).round() as u32)
            .ok_or_else(|| "invalid window dimension".to_owned())
    };
    Ok((dimension(w.inner_width())?, dimension(w.inner_height())?))
}

/// Shows a blocking alert dialog. Failures to show it are ignored, since there is nothing
/// left to report them to.
pub fn alert(message: &str) {
    if let Ok(w) = window() {
        let _ = w.alert_with_message(message);
    }
}

/// Extracts an error message from a JavaScript error.
pub fn error_message(error: &JsValue) -> Option<String> {
    Reflect::get(error, &JsValue::from_str("message"))
        .as_ref()
        .ok()
        .and_then(JsValue::as_string)
}
