//! Browser transport for backend requests
//!
//! Builds the multipart form with `FormData` and sends it with `fetch`.
//! Every request is aborted after its timeout so the caller's promise
//! always settles.

use js_sys::{Array, Function, Uint8Array};
use pdftools_core::backend::{
    backend_error, content_disposition_filename, endpoint_url, parse_status, CSRF_HEADER,
};
use pdftools_core::{PdfStatus, ToolRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

/// A response body to hand to the download link
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// `{ filename, bytes }` for JavaScript
    pub fn into_js(self) -> Result<JsValue, JsValue> {
        let object = js_sys::Object::new();
        js_sys::Reflect::set(&object, &"filename".into(), &JsValue::from_str(&self.filename))?;
        js_sys::Reflect::set(
            &object,
            &"bytes".into(),
            &Uint8Array::from(self.bytes.as_slice()),
        )?;
        Ok(object.into())
    }
}

struct RawResponse {
    status: u16,
    ok: bool,
    disposition: Option<String>,
    body: Vec<u8>,
}

fn form_for(request: &ToolRequest) -> Result<FormData, JsValue> {
    let form = FormData::new()?;

    for (field, upload) in request.files() {
        let parts = Array::of1(&Uint8Array::from(upload.bytes.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(upload.content_type());
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        form.append_with_blob_and_filename(field, &blob, &upload.name)?;
    }

    for (field, value) in request.fields() {
        form.append_with_str(field, &value)?;
    }

    Ok(form)
}

async fn send(
    base_url: &str,
    csrf_token: Option<&str>,
    request: &ToolRequest,
    timeout_ms: i32,
) -> Result<RawResponse, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let url = endpoint_url(base_url, request.endpoint());

    let controller = AbortController::new()?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&form_for(request)?.into());
    opts.set_signal(Some(&controller.signal()));

    let http_request = Request::new_with_str_and_init(&url, &opts)?;
    if let Some(token) = csrf_token.filter(|t| !t.is_empty()) {
        http_request.headers().set(CSRF_HEADER, token)?;
    }

    let abort = Closure::once_into_js(move || controller.abort());
    let timer = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        abort.unchecked_ref::<Function>(),
        timeout_ms,
    )?;

    let result = async {
        let response: Response = JsFuture::from(window.fetch_with_request(&http_request))
            .await?
            .dyn_into()?;
        let disposition = response.headers().get("Content-Disposition")?;
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        Ok::<_, JsValue>(RawResponse {
            status: response.status(),
            ok: response.ok(),
            disposition,
            body: Uint8Array::new(&buffer).to_vec(),
        })
    }
    .await;

    window.clear_timeout_with_handle(timer);

    result.map_err(|e| {
        web_sys::console::warn_1(&e);
        JsValue::from_str(&format!(
            "Request to {} failed or timed out",
            request.endpoint()
        ))
    })
}

/// Send a tool request and return the transformed file
pub async fn submit(
    base_url: &str,
    csrf_token: Option<&str>,
    request: &ToolRequest,
    timeout_ms: i32,
) -> Result<Download, JsValue> {
    let response = send(base_url, csrf_token, request, timeout_ms).await?;

    if !response.ok {
        let error = backend_error(response.status, &response.body);
        return Err(JsValue::from_str(&error.to_string()));
    }

    let filename = response
        .disposition
        .as_deref()
        .and_then(content_disposition_filename)
        .unwrap_or_else(|| request.default_filename());

    Ok(Download {
        filename,
        bytes: response.body,
    })
}

/// Ask the backend whether a file is password protected
pub async fn check_status(
    base_url: &str,
    csrf_token: Option<&str>,
    request: &ToolRequest,
    timeout_ms: i32,
) -> Result<PdfStatus, JsValue> {
    let response = send(base_url, csrf_token, request, timeout_ms).await?;

    if !response.ok {
        let error = backend_error(response.status, &response.body);
        return Err(JsValue::from_str(&error.to_string()));
    }

    parse_status(&response.body).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use pdftools_core::{ImageLayout, SplitMethod, Upload};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn blob_type(value: JsValue) -> String {
        value.dyn_into::<Blob>().map(|b| b.type_()).unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn test_split_form_entries() {
        let request = ToolRequest::Split {
            file: Upload::new("report.pdf", b"%PDF-1.7".to_vec()),
            method: SplitMethod::ExtractPages("1-3, 5".into()),
        };
        let form = form_for(&request).unwrap();

        assert_eq!(form.get_all("pdf_file").length(), 1);
        assert_eq!(blob_type(form.get("pdf_file")), "application/pdf");
        assert_eq!(
            form.get("split_method").as_string().as_deref(),
            Some("extract_pages")
        );
        assert_eq!(
            form.get("pages_specification").as_string().as_deref(),
            Some("1-3, 5")
        );
        assert!(form.get("pages_per_file").is_null());
    }

    #[wasm_bindgen_test]
    fn test_merge_form_keeps_every_file() {
        let request = ToolRequest::Merge {
            files: vec![
                Upload::new("a.pdf", b"%PDF-1.7 a".to_vec()),
                Upload::new("b.pdf", b"%PDF-1.7 b".to_vec()),
                Upload::new("c.pdf", b"%PDF-1.7 c".to_vec()),
            ],
        };
        let form = form_for(&request).unwrap();
        assert_eq!(form.get_all("pdf_files").length(), 3);
        assert!(form.get("pdf_file").is_null());
    }

    #[wasm_bindgen_test]
    fn test_image_form_uses_image_types() {
        let request = ToolRequest::ImagesToPdf {
            images: vec![
                Upload::new("scan.png", vec![0x89, 0x50]),
                Upload::new("photo.jpg", vec![0xFF, 0xD8]),
            ],
            layout: ImageLayout::default(),
        };
        let form = form_for(&request).unwrap();

        let files = form.get_all("image_files");
        assert_eq!(files.length(), 2);
        assert_eq!(blob_type(files.get(0)), "image/png");
        assert_eq!(blob_type(files.get(1)), "image/jpeg");
        assert_eq!(form.get("page_size").as_string().as_deref(), Some("A4"));
        assert_eq!(form.get("image_fit").as_string().as_deref(), Some("fit"));
    }
}
