//! WASM bindings for the PDF split tool
//!
//! State lives in Rust via `PdfSplitSession`; JavaScript handles DOM events,
//! file input and pdf.js rendering.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfSplitSession } from './pkg/pdftools_wasm.js';
//!
//! await init();
//!
//! const session = new PdfSplitSession();
//! session.loadDocument(file.name, bytes);
//! session.setSpecification("1-3, 5");
//! await session.renderVisibleGroup(page => renderToDataUrl(pdf, page), 15000);
//! const { filename, bytes: zip } = await session.submit("/tools/", csrfToken, 60000);
//! ```

pub mod renderer;
pub mod session;
pub mod transport;

use pdftools_core::{format_page_spec, inspect_pdf, parse_page_spec, ToolRequest, Upload};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub use session::PdfSplitSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Resolve a page specification to sorted page numbers
#[wasm_bindgen(js_name = parsePageSpec)]
pub fn parse_page_spec_js(spec: &str, total_pages: u32) -> Result<Vec<u32>, JsValue> {
    parse_page_spec(spec, total_pages).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compress page numbers into a canonical specification
#[wasm_bindgen(js_name = formatPageSpec)]
pub fn format_page_spec_js(pages: Vec<u32>) -> String {
    format_page_spec(&pages)
}

/// Quick validation check for a PDF file
#[wasm_bindgen(js_name = quickValidate)]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    pdftools_core::quick_validate(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get PDF info without creating a session
#[wasm_bindgen(js_name = getPdfInfo)]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = inspect_pdf(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Ask the backend whether a PDF is password protected
///
/// Resolves to `{ encrypted: bool }`, or `{ encrypted: null, error }` when
/// the backend could not read the file.
#[wasm_bindgen(js_name = checkPdfStatus)]
pub fn check_pdf_status(
    base_url: String,
    csrf_token: Option<String>,
    name: String,
    bytes: Vec<u8>,
    timeout_ms: Option<i32>,
) -> js_sys::Promise {
    let request = ToolRequest::CheckStatus {
        file: Upload::new(name, bytes),
    };
    let timeout_ms = timeout_ms.unwrap_or(30_000);

    future_to_promise(async move {
        let status =
            transport::check_status(&base_url, csrf_token.as_deref(), &request, timeout_ms)
                .await?;

        let object = js_sys::Object::new();
        let encrypted = match status.is_protected() {
            Some(flag) => JsValue::from_bool(flag),
            None => JsValue::NULL,
        };
        js_sys::Reflect::set(&object, &"encrypted".into(), &encrypted)?;
        if let pdftools_core::PdfStatus::Unreadable(reason) = &status {
            js_sys::Reflect::set(&object, &"error".into(), &JsValue::from_str(reason))?;
        }
        Ok(object.into())
    })
}

/// Format bytes as human-readable string
#[wasm_bindgen(js_name = formatBytes)]
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
