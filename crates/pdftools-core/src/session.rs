//! Split tool state
//!
//! One `SplitState` per tool instance. Every mutation runs to completion
//! synchronously; async work (rendering, submission) reads what it needs,
//! releases the state, and writes results back afterwards.

use crate::backend::{SplitMethod, ToolRequest, Upload};
use crate::document::PdfInfo;
use crate::error::{PdfToolsError, ValidationError};
use crate::preview::{Preview, PreviewCache};
use crate::ranges::parse_page_spec;
use crate::selection::SelectedPages;
use crate::working_set::{GroupInfo, ViewMode, WorkingSet, DEFAULT_GROUP_SIZE};

/// The loaded document as far as the split tool is concerned
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub name: String,
    pub info: PdfInfo,
}

#[derive(Debug)]
pub struct SplitState<B> {
    document: Option<LoadedDocument>,
    specification: String,
    selection: SelectedPages,
    working_set: WorkingSet,
    previews: PreviewCache<B>,
    method: Option<SplitMethod>,
    submitting: bool,
    generation: u64,
}

impl<B> Default for SplitState<B> {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_SIZE)
    }
}

impl<B> SplitState<B> {
    pub fn new(group_size: usize) -> Self {
        Self {
            document: None,
            specification: String::new(),
            selection: SelectedPages::new(),
            working_set: WorkingSet::new(group_size),
            previews: PreviewCache::new(),
            method: None,
            submitting: false,
            generation: 0,
        }
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn total_pages(&self) -> u32 {
        self.document.as_ref().map_or(0, |d| d.info.page_count)
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    pub fn selection(&self) -> &SelectedPages {
        &self.selection
    }

    pub fn previews(&self) -> &PreviewCache<B> {
        &self.previews
    }

    pub fn mode(&self) -> ViewMode {
        self.working_set.mode()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Changes whenever cached previews become invalid
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the document; all selection and preview state starts over
    pub fn load_document(&mut self, name: impl Into<String>, info: PdfInfo) {
        self.clear_document();
        self.document = Some(LoadedDocument {
            name: name.into(),
            info,
        });
    }

    pub fn clear_document(&mut self) {
        self.document = None;
        self.specification.clear();
        self.selection.clear();
        self.working_set.reset();
        self.previews.clear();
        self.method = None;
        self.generation += 1;
    }

    /// Parse `text` and make it the selection
    ///
    /// On error nothing changes: the previous selection, text and view stay.
    pub fn apply_specification(&mut self, text: &str) -> Result<&SelectedPages, PdfToolsError> {
        let total = self.total_pages();
        if self.document.is_none() {
            return Err(PdfToolsError::NoDocument);
        }

        let pages = parse_page_spec(text, total)?;
        self.selection.replace(pages);
        self.specification = text.trim().to_string();
        self.working_set.set_mode(ViewMode::Selected);
        Ok(&self.selection)
    }

    /// Flip one page. Returns whether it is selected afterwards.
    pub fn toggle_page(&mut self, page: u32) -> bool {
        let selected = self.selection.toggle(page);
        self.selection_changed();
        selected
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.total_pages());
        self.selection_changed();
    }

    /// Select or deselect the whole visible group
    pub fn toggle_group(&mut self) {
        let group = self.visible_pages();
        self.selection.toggle_group(&group);
        self.selection_changed();
    }

    /// Drop the selection, the previews and the all-pages view
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.specification.clear();
        self.previews.clear();
        self.working_set.reset();
        self.generation += 1;
    }

    /// Browse every page of the document, starting with nothing selected
    pub fn show_all_pages(&mut self) -> Result<(), PdfToolsError> {
        if self.document.is_none() {
            return Err(PdfToolsError::NoDocument);
        }
        self.selection.clear();
        self.specification.clear();
        self.working_set.set_mode(ViewMode::AllPages);
        Ok(())
    }

    /// Returns true when the visible group changed
    pub fn navigate(&mut self, direction: i64) -> bool {
        let total = self.total_pages();
        self.working_set.navigate(direction, total, &self.selection)
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        self.working_set.group_pages(self.total_pages(), &self.selection)
    }

    pub fn group_info(&self) -> GroupInfo {
        self.working_set.group_info(self.total_pages(), &self.selection)
    }

    /// Visible pages that still need a preview
    pub fn pages_to_render(&self) -> Vec<u32> {
        self.previews.missing(&self.visible_pages())
    }

    /// Store previews rendered while `generation` was current
    ///
    /// Renders that finish after the document was replaced or the preview
    /// cache was cleared are dropped.
    pub fn store_previews(&mut self, generation: u64, rendered: Vec<(u32, Preview<B>)>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale previews");
            return;
        }
        let total = self.total_pages();
        self.previews
            .store(rendered.into_iter().filter(|(page, _)| (1..=total).contains(page)));
    }

    /// Choose how to split. `None` extracts the current selection.
    pub fn set_method(&mut self, method: Option<SplitMethod>) {
        self.method = method;
    }

    /// Method to submit: an explicit one, or extraction of the current selection
    pub fn effective_method(&self) -> Result<SplitMethod, PdfToolsError> {
        match &self.method {
            Some(method) => Ok(method.clone()),
            None if self.selection.is_empty() => Err(ValidationError::EmptyResult.into()),
            None => Ok(SplitMethod::ExtractPages(self.selection.to_spec())),
        }
    }

    pub fn can_execute(&self) -> bool {
        self.document.is_some() && !self.submitting && self.effective_method().is_ok()
    }

    /// Claim the single submission slot and build the request
    ///
    /// Fails with [`PdfToolsError::Busy`] while a previous submission is
    /// outstanding. Call [`SplitState::finish_submit`] when it settles.
    pub fn begin_submit(&mut self, bytes: Vec<u8>) -> Result<ToolRequest, PdfToolsError> {
        if self.submitting {
            return Err(PdfToolsError::Busy);
        }
        let document = self.document.as_ref().ok_or(PdfToolsError::NoDocument)?;

        let request = ToolRequest::Split {
            file: Upload::new(document.name.clone(), bytes),
            method: self.effective_method()?,
        };
        request.validate()?;

        if let ToolRequest::Split {
            method: SplitMethod::ExtractPages(spec),
            ..
        } = &request
        {
            self.specification = spec.clone();
        }

        self.submitting = true;
        tracing::debug!(endpoint = request.endpoint(), "submission started");
        Ok(request)
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    fn selection_changed(&mut self) {
        self.specification = self.selection.to_spec();
        let total = self.total_pages();
        self.working_set.settle(total, &self.selection);
    }
}
