//! pdf.js bridge
//!
//! Rasterization stays in JavaScript (pdf.js draws to a canvas). The page
//! supplies a function `(pageNumber) => Promise<string>` resolving to a data
//! URL, and this module adapts it to the core `Renderer` contract.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use pdftools_core::{RenderError, Renderer};
use std::future::Future;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub struct JsRenderer {
    render_fn: Function,
}

impl JsRenderer {
    pub fn new(render_fn: Function) -> Self {
        Self { render_fn }
    }
}

#[async_trait(?Send)]
impl Renderer for JsRenderer {
    type Bitmap = String;

    async fn render(&self, page: u32) -> Result<String, RenderError> {
        let value = self
            .render_fn
            .call1(&JsValue::NULL, &JsValue::from(page))
            .map_err(|e| RenderError(describe(&e)))?;

        // Accept plain values as well as promises
        let resolved = JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(|e| RenderError(describe(&e)))?;

        resolved
            .as_string()
            .ok_or_else(|| RenderError("Renderer did not return an image URL".into()))
    }
}

/// Resolves after `ms` milliseconds
///
/// Uses the global `setTimeout`, so it also works in workers. When no timer
/// can be armed it resolves at once.
pub fn sleep(ms: i32) -> impl Future<Output = ()> {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) = arm_timer(&resolve, ms) {
            web_sys::console::warn_1(&e);
            resolve.call0(&JsValue::NULL).ok();
        }
    });
    async move {
        JsFuture::from(promise).await.ok();
    }
}

fn arm_timer(callback: &Function, ms: i32) -> Result<(), JsValue> {
    let global = js_sys::global();
    let set_timeout: Function =
        js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))?.dyn_into()?;
    set_timeout.call2(&global, callback, &JsValue::from(ms))?;
    Ok(())
}

/// Best-effort text for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
