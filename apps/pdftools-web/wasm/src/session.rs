//! Split tool session
//!
//! Holds the document and the whole selection state in Rust so the page
//! script only wires DOM events to these methods and renders what they
//! return. Async operations hand back promises; the selection state is
//! shared with them through `Rc<RefCell<_>>` and never borrowed across an
//! await.

use crate::renderer::{sleep, JsRenderer};
use crate::transport;
use pdftools_core::preview::render_pages;
use pdftools_core::{inspect_pdf, PdfInfo, Preview, SplitMethod, SplitState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

const DEFAULT_TIMEOUT_MS: i32 = 60_000;
const DEFAULT_RENDER_TIMEOUT_MS: i32 = 15_000;

/// Split/extract session for one loaded document
#[wasm_bindgen]
pub struct PdfSplitSession {
    state: Rc<RefCell<SplitState<String>>>,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl PdfSplitSession {
    /// Create a session. `group_size` defaults to 12 previews per group.
    #[wasm_bindgen(constructor)]
    pub fn new(group_size: Option<usize>) -> Self {
        let state = match group_size {
            Some(size) => SplitState::new(size),
            None => SplitState::default(),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            bytes: Vec::new(),
        }
    }

    fn load_document_internal(&mut self, name: &str, bytes: &[u8]) -> Result<PdfInfo, String> {
        let info = inspect_pdf(bytes).map_err(|e| e.to_string())?;
        self.state.borrow_mut().load_document(name, info.clone());
        self.bytes = bytes.to_vec();
        Ok(info)
    }

    /// Load a PDF, replacing any previous one. Returns its info.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let info = self
            .load_document_internal(name, bytes)
            .map_err(|e| JsValue::from_str(&e))?;

        serde_wasm_bindgen::to_value(&info)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = clearFile)]
    pub fn clear_file(&mut self) {
        self.state.borrow_mut().clear_document();
        self.bytes.clear();
    }

    /// Document bytes for pdf.js
    #[wasm_bindgen(js_name = getDocumentBytes)]
    pub fn get_document_bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }

    #[wasm_bindgen(getter, js_name = totalPages)]
    pub fn total_pages(&self) -> u32 {
        self.state.borrow().total_pages()
    }

    fn set_specification_internal(&mut self, text: &str) -> Result<Vec<u32>, String> {
        let mut state = self.state.borrow_mut();
        let selected = state.apply_specification(text).map_err(|e| e.to_string())?;
        Ok(selected.to_vec())
    }

    /// Parse the specification field. On error the previous selection is kept.
    #[wasm_bindgen(js_name = setSpecification)]
    pub fn set_specification(&mut self, text: &str) -> Result<Vec<u32>, JsValue> {
        self.set_specification_internal(text)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Canonical specification for the current selection
    #[wasm_bindgen(getter)]
    pub fn specification(&self) -> String {
        self.state.borrow().specification().to_string()
    }

    #[wasm_bindgen(js_name = getSelectedPages)]
    pub fn get_selected_pages(&self) -> Vec<u32> {
        self.state.borrow().selection().to_vec()
    }

    #[wasm_bindgen(getter, js_name = selectedCount)]
    pub fn selected_count(&self) -> usize {
        self.state.borrow().selection().len()
    }

    #[wasm_bindgen(js_name = isSelected)]
    pub fn is_selected(&self, page: u32) -> bool {
        self.state.borrow().selection().contains(page)
    }

    /// Flip a page from the preview grid. Returns whether it is now selected.
    #[wasm_bindgen(js_name = togglePage)]
    pub fn toggle_page(&mut self, page: u32) -> bool {
        self.state.borrow_mut().toggle_page(page)
    }

    #[wasm_bindgen(js_name = selectAllPages)]
    pub fn select_all_pages(&mut self) {
        self.state.borrow_mut().select_all();
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.state.borrow_mut().clear_selection();
    }

    /// Select or deselect every page of the visible group
    #[wasm_bindgen(js_name = toggleGroup)]
    pub fn toggle_group(&mut self) {
        self.state.borrow_mut().toggle_group();
    }

    /// Switch to browsing all pages with an empty selection
    #[wasm_bindgen(js_name = showAllPages)]
    pub fn show_all_pages(&mut self) -> Result<(), JsValue> {
        self.state
            .borrow_mut()
            .show_all_pages()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = showingAllPages)]
    pub fn showing_all_pages(&self) -> bool {
        self.state.borrow().mode() == pdftools_core::ViewMode::AllPages
    }

    /// Move by `direction` groups. Returns true when the visible group changed.
    pub fn navigate(&mut self, direction: i32) -> bool {
        self.state.borrow_mut().navigate(i64::from(direction))
    }

    #[wasm_bindgen(js_name = visiblePages)]
    pub fn visible_pages(&self) -> Vec<u32> {
        self.state.borrow().visible_pages()
    }

    /// Navigation summary for the visible group
    #[wasm_bindgen(js_name = groupInfo)]
    pub fn group_info(&self) -> Result<JsValue, JsValue> {
        let info = self.state.borrow().group_info();
        serde_wasm_bindgen::to_value(&info)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Data URL of a cached preview, if it rendered
    #[wasm_bindgen(js_name = previewFor)]
    pub fn preview_for(&self, page: u32) -> Option<String> {
        self.state
            .borrow()
            .previews()
            .get(page)
            .and_then(Preview::bitmap)
            .cloned()
    }

    /// True when the page's preview failed or timed out
    #[wasm_bindgen(js_name = isPlaceholder)]
    pub fn is_placeholder(&self, page: u32) -> bool {
        self.state
            .borrow()
            .previews()
            .get(page)
            .is_some_and(Preview::is_placeholder)
    }

    fn set_split_method_internal(
        &mut self,
        method: &str,
        first: Option<u32>,
        second: Option<u32>,
    ) -> Result<(), String> {
        let method = match method {
            "pages_per_file" => Some(SplitMethod::PagesPerFile(
                first.ok_or("Pages per file is required")?,
            )),
            "page_range" => Some(SplitMethod::PageRange {
                start: first.ok_or("Start page is required")?,
                end: second.ok_or("End page is required")?,
            }),
            "extract_pages" => None,
            other => return Err(format!("Unknown split method: {}", other)),
        };
        self.state.borrow_mut().set_method(method);
        Ok(())
    }

    /// Choose `pages_per_file` (n), `page_range` (start, end) or `extract_pages`
    #[wasm_bindgen(js_name = setSplitMethod)]
    pub fn set_split_method(
        &mut self,
        method: &str,
        first: Option<u32>,
        second: Option<u32>,
    ) -> Result<(), JsValue> {
        self.set_split_method_internal(method, first, second)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        self.state.borrow().can_execute()
    }

    #[wasm_bindgen(getter, js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting()
    }

    /// Render previews for the visible group that are not cached yet
    ///
    /// `render_fn(page)` must return a promise of a data URL. Failed or slow
    /// pages become placeholders. Resolves to the number of pages rendered.
    #[wasm_bindgen(js_name = renderVisibleGroup)]
    pub fn render_visible_group(
        &self,
        render_fn: js_sys::Function,
        timeout_ms: Option<i32>,
    ) -> js_sys::Promise {
        let state = Rc::clone(&self.state);
        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_RENDER_TIMEOUT_MS);

        future_to_promise(async move {
            let (generation, pages) = {
                let state = state.borrow();
                (state.generation(), state.pages_to_render())
            };

            let renderer = JsRenderer::new(render_fn);
            let rendered = render_pages(&renderer, &pages, || sleep(timeout_ms)).await;
            let count = rendered.len();

            state.borrow_mut().store_previews(generation, rendered);
            Ok(JsValue::from(count as u32))
        })
    }

    /// Submit the split to the backend
    ///
    /// Rejects immediately while another submission is outstanding. Resolves
    /// to `{ filename, bytes }`.
    pub fn submit(
        &self,
        base_url: String,
        csrf_token: Option<String>,
        timeout_ms: Option<i32>,
    ) -> Result<js_sys::Promise, JsValue> {
        let request = self
            .state
            .borrow_mut()
            .begin_submit(self.bytes.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let state = Rc::clone(&self.state);
        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);

        Ok(future_to_promise(async move {
            let result =
                transport::submit(&base_url, csrf_token.as_deref(), &request, timeout_ms).await;
            state.borrow_mut().finish_submit();
            result?.into_js()
        }))
    }
}
