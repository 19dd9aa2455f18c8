//! Page selection and backend contract for the PDF tools
//!
//! The PDF work itself (splitting, merging, compressing, unlocking) is done
//! by the transform backend. This crate holds everything the clients decide
//! before and after talking to it:
//! - `ranges` / `selection` / `working_set`: page specifications, the
//!   selected pages and the paginated preview grid
//! - `preview`: the renderer contract and the preview cache
//! - `backend`: multipart fields, endpoints and response interpretation
//! - `session`: the split tool's state in one explicit object
//! - `rotation`, `files`, `image_layout`: inputs of the rotate, merge and
//!   image conversion tools

pub mod backend;
pub mod document;
pub mod error;
pub mod files;
pub mod image_layout;
pub mod preview;
pub mod ranges;
pub mod rotation;
pub mod selection;
pub mod session;
pub mod working_set;

pub use backend::{
    content_disposition_filename, endpoint_url, error_message, parse_status, rotations_json,
    PdfStatus, SplitMethod, ToolRequest, Upload,
};
pub use document::{inspect_pdf, page_rotations, quick_validate, PdfInfo};
pub use error::{PdfToolsError, ValidationError, ValidationKind};
pub use files::{AddReport, FileKind, FileList};
pub use image_layout::{ImageFit, ImageLayout, Margins, Orientation, PageSize};
pub use preview::{PlaceholderReason, Preview, PreviewCache, RenderError, Renderer};
pub use ranges::{format_page_spec, parse_page_spec};
pub use rotation::{normalize_angle, PageRotations, RotationState};
pub use selection::{toggle, SelectedPages};
pub use session::SplitState;
pub use working_set::{paginate, GroupInfo, ViewMode, WorkingSet, DEFAULT_GROUP_SIZE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specification_round_trip_through_selection() {
        let pages = parse_page_spec("8-10, 1-3, 5", 10).unwrap();
        let mut selection = SelectedPages::new();
        selection.replace(pages.clone());

        let spec = selection.to_spec();
        assert_eq!(spec, "1-3, 5, 8-10");
        assert_eq!(parse_page_spec(&spec, 10).unwrap(), pages);
    }

    #[test]
    fn test_paginate_end_to_end() {
        let pages = parse_page_spec("1-15", 20).unwrap();
        assert_eq!(pages.len(), 15);
        assert_eq!(paginate(pages.len(), DEFAULT_GROUP_SIZE, 0, 1), 1);
        assert_eq!(paginate(pages.len(), DEFAULT_GROUP_SIZE, 1, 1), 1);
    }
}
