//! File lists for the multi-file tools
//!
//! Merge takes up to ten PDFs and skips files already in the list (same
//! name and size). The image converter takes images of up to 10 MB each
//! and keeps duplicates, with the order set by the user.

use crate::backend::Upload;
use crate::document::quick_validate;
use crate::error::PdfToolsError;

pub const MAX_MERGE_FILES: usize = 10;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
}

/// Outcome of adding a batch of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: usize,
    /// Names skipped because they were already listed
    pub duplicates: Vec<String>,
    /// Names with the reason they were refused
    pub rejected: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList {
    kind: FileKind,
    max_files: Option<usize>,
    max_file_bytes: Option<usize>,
    skip_duplicates: bool,
    files: Vec<Upload>,
}

impl FileList {
    /// Input list for merging
    pub fn pdfs() -> Self {
        Self {
            kind: FileKind::Pdf,
            max_files: Some(MAX_MERGE_FILES),
            max_file_bytes: None,
            skip_duplicates: true,
            files: Vec::new(),
        }
    }

    /// Input list for image conversion
    pub fn images() -> Self {
        Self {
            kind: FileKind::Image,
            max_files: None,
            max_file_bytes: Some(MAX_IMAGE_BYTES),
            skip_duplicates: false,
            files: Vec::new(),
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[Upload] {
        &self.files
    }

    pub fn into_files(self) -> Vec<Upload> {
        self.files
    }

    fn refusal(&self, upload: &Upload) -> Option<String> {
        match self.kind {
            FileKind::Pdf if !upload.is_pdf() => return Some("not a PDF file".into()),
            FileKind::Image if !upload.is_image() => return Some("not an image".into()),
            _ => {}
        }
        if let Some(max) = self.max_file_bytes.filter(|max| upload.bytes.len() > *max) {
            return Some(format!("larger than {} MB", max / (1024 * 1024)));
        }
        if self.kind == FileKind::Pdf {
            if let Err(e) = quick_validate(&upload.bytes) {
                return Some(e.to_string());
            }
        }
        None
    }

    /// Append a batch in order
    ///
    /// A batch that would exceed the file limit is refused as a whole.
    pub fn add(&mut self, uploads: Vec<Upload>) -> Result<AddReport, PdfToolsError> {
        if let Some(max) = self.max_files {
            if self.files.len() + uploads.len() > max {
                return Err(PdfToolsError::InvalidRequest(format!(
                    "At most {} files can be added",
                    max
                )));
            }
        }

        let mut report = AddReport::default();
        for upload in uploads {
            if let Some(reason) = self.refusal(&upload) {
                tracing::warn!(name = %upload.name, %reason, "file refused");
                report.rejected.push((upload.name, reason));
                continue;
            }

            let listed = self
                .files
                .iter()
                .any(|f| f.name == upload.name && f.bytes.len() == upload.bytes.len());
            if self.skip_duplicates && listed {
                report.duplicates.push(upload.name);
                continue;
            }

            self.files.push(upload);
            report.added += 1;
        }
        Ok(report)
    }

    pub fn remove(&mut self, index: usize) -> Option<Upload> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Swap a file with its neighbour. Returns its new index.
    pub fn move_file(&mut self, index: usize, direction: i64) -> Option<usize> {
        let target = i64::try_from(index).ok()?.checked_add(direction)?;
        let target = usize::try_from(target).ok()?;
        if index >= self.files.len() || target >= self.files.len() || target == index {
            return None;
        }
        self.files.swap(index, target);
        Some(target)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
