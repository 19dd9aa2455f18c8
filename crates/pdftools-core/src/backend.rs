//! Transform backend contract
//!
//! The backend receives multipart forms and answers either with the
//! transformed file (named by `Content-Disposition`) or with a JSON error
//! body carrying a `message`. This module knows the field names, the
//! endpoint paths and how to read responses; the HTTP transport lives with
//! the caller (browser `fetch` or `reqwest`).

use crate::error::PdfToolsError;
use crate::image_layout::{ImageLayout, Margins};
use crate::ranges::{format_page_spec, parse_page_spec};
use crate::rotation::PageRotations;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

pub const FIELD_PDF_FILE: &str = "pdf_file";
pub const FIELD_PDF_FILES: &str = "pdf_files";
pub const FIELD_SPLIT_METHOD: &str = "split_method";
pub const FIELD_PAGES_PER_FILE: &str = "pages_per_file";
pub const FIELD_START_PAGE: &str = "start_page";
pub const FIELD_END_PAGE: &str = "end_page";
pub const FIELD_PAGES_SPECIFICATION: &str = "pages_specification";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_PAGE_ROTATIONS: &str = "page_rotations";
pub const FIELD_IMAGE_FILES: &str = "image_files";
pub const FIELD_PAGE_SIZE: &str = "page_size";
pub const FIELD_ORIENTATION: &str = "orientation";
pub const FIELD_MARGINS: &str = "margins";
pub const FIELD_IMAGE_FIT: &str = "image_fit";
pub const FIELD_MARGIN_TOP: &str = "margin_top";
pub const FIELD_MARGIN_BOTTOM: &str = "margin_bottom";
pub const FIELD_MARGIN_LEFT: &str = "margin_left";
pub const FIELD_MARGIN_RIGHT: &str = "margin_right";

/// Download name the image converter has always used
pub const CONVERTED_IMAGES_FILENAME: &str = "imagenes_convertidas.pdf";

pub const CSRF_HEADER: &str = "X-CSRFToken";

const GENERIC_ERROR: &str = "Failed to process the PDF";

lazy_static! {
    static ref DISPOSITION_FILENAME: Regex =
        Regex::new(r#"filename[^;=\n]*=("[^"]*"|'[^']*'|[^;\n]*)"#).unwrap();
}

/// How the split tool divides the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMethod {
    /// Chunks of `n` pages, returned as a zip
    PagesPerFile(u32),
    /// One inclusive range
    PageRange { start: u32, end: u32 },
    /// Arbitrary pages given as a page specification
    ExtractPages(String),
}

impl SplitMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SplitMethod::PagesPerFile(_) => "pages_per_file",
            SplitMethod::PageRange { .. } => "page_range",
            SplitMethod::ExtractPages(_) => "extract_pages",
        }
    }

    /// Extract pages, normalizing the specification against the document
    pub fn extract(spec: &str, total_pages: u32) -> Result<Self, PdfToolsError> {
        let pages = parse_page_spec(spec, total_pages)?;
        Ok(SplitMethod::ExtractPages(format_page_spec(&pages)))
    }

    fn validate(&self) -> Result<(), PdfToolsError> {
        match self {
            SplitMethod::PagesPerFile(0) => Err(PdfToolsError::InvalidRequest(
                "Pages per file must be a positive integer".into(),
            )),
            SplitMethod::PageRange { start, end } if *start == 0 || *end == 0 => Err(
                PdfToolsError::InvalidRequest("Page numbers must be positive integers".into()),
            ),
            SplitMethod::PageRange { start, end } if start > end => Err(
                PdfToolsError::InvalidRequest("Start page cannot be after end page".into()),
            ),
            SplitMethod::ExtractPages(spec) if spec.trim().is_empty() => Err(
                PdfToolsError::InvalidRequest("Page specification cannot be empty".into()),
            ),
            _ => Ok(()),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![(FIELD_SPLIT_METHOD, self.name().to_string())];
        match self {
            SplitMethod::PagesPerFile(n) => fields.push((FIELD_PAGES_PER_FILE, n.to_string())),
            SplitMethod::PageRange { start, end } => {
                fields.push((FIELD_START_PAGE, start.to_string()));
                fields.push((FIELD_END_PAGE, end.to_string()));
            }
            SplitMethod::ExtractPages(spec) => {
                fields.push((FIELD_PAGES_SPECIFICATION, spec.clone()))
            }
        }
        fields
    }
}

/// A file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// File name without a trailing `.pdf`
    pub fn base_name(&self) -> &str {
        let name = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        match name.len().checked_sub(4) {
            Some(cut) if name.get(cut..).is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf")) => {
                &name[..cut]
            }
            _ => name,
        }
    }

    /// MIME type from the file extension
    pub fn content_type(&self) -> &'static str {
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => "application/pdf",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            "tif" | "tiff" => "image/tiff",
            _ => "application/octet-stream",
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type() == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.content_type().starts_with("image/")
    }
}

/// One user action against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Merge { files: Vec<Upload> },
    Split { file: Upload, method: SplitMethod },
    Compress { file: Upload },
    Unlock { file: Upload, password: String },
    /// Final angle per zero-based page index
    Rotate { file: Upload, rotations: PageRotations },
    /// Images in page order
    ImagesToPdf { images: Vec<Upload>, layout: ImageLayout },
    CheckStatus { file: Upload },
}

impl ToolRequest {
    /// Path relative to the backend base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            ToolRequest::Merge { .. } => "join/",
            ToolRequest::Split { .. } => "split/",
            ToolRequest::Compress { .. } => "compres/",
            ToolRequest::Unlock { .. } => "desbloquear/",
            ToolRequest::Rotate { .. } => "rotar/",
            ToolRequest::ImagesToPdf { .. } => "imagen/",
            ToolRequest::CheckStatus { .. } => "check-pdf-status/",
        }
    }

    /// Reject requests the backend would refuse anyway
    pub fn validate(&self) -> Result<(), PdfToolsError> {
        match self {
            ToolRequest::Merge { files } if files.len() < 2 => Err(
                PdfToolsError::InvalidRequest("Select at least two PDF files to merge".into()),
            ),
            ToolRequest::Split { method, .. } => method.validate(),
            ToolRequest::Unlock { password, .. } if password.is_empty() => Err(
                PdfToolsError::InvalidRequest("A password is required".into()),
            ),
            ToolRequest::Rotate { rotations, .. } if rotations.is_empty() => Err(
                PdfToolsError::InvalidRequest("No pages to rotate".into()),
            ),
            ToolRequest::Rotate { rotations, .. } => match rotations
                .iter()
                .find(|(_, angle)| **angle >= 360 || **angle % 90 != 0)
            {
                Some((index, angle)) => Err(PdfToolsError::InvalidRequest(format!(
                    "Page {} has an invalid rotation of {} degrees",
                    index + 1,
                    angle
                ))),
                None => Ok(()),
            },
            ToolRequest::ImagesToPdf { images, .. } if images.is_empty() => Err(
                PdfToolsError::InvalidRequest("Select at least one image".into()),
            ),
            ToolRequest::ImagesToPdf { images, .. } => match images.iter().find(|i| !i.is_image()) {
                Some(image) => Err(PdfToolsError::InvalidRequest(format!(
                    "{} is not a supported image",
                    image.name
                ))),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Text fields of the multipart form, in submission order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ToolRequest::Split { method, .. } => method.fields(),
            ToolRequest::Unlock { password, .. } => vec![(FIELD_PASSWORD, password.clone())],
            ToolRequest::Rotate { rotations, .. } => {
                vec![(FIELD_PAGE_ROTATIONS, rotations_json(rotations))]
            }
            ToolRequest::ImagesToPdf { layout, .. } => layout_fields(layout),
            _ => Vec::new(),
        }
    }

    /// File parts of the multipart form with their field name
    pub fn files(&self) -> Vec<(&'static str, &Upload)> {
        match self {
            ToolRequest::Merge { files } => files.iter().map(|f| (FIELD_PDF_FILES, f)).collect(),
            ToolRequest::ImagesToPdf { images, .. } => {
                images.iter().map(|f| (FIELD_IMAGE_FILES, f)).collect()
            }
            ToolRequest::Split { file, .. }
            | ToolRequest::Compress { file }
            | ToolRequest::Unlock { file, .. }
            | ToolRequest::Rotate { file, .. }
            | ToolRequest::CheckStatus { file } => vec![(FIELD_PDF_FILE, file)],
        }
    }

    /// Name to save the result under when the response does not suggest one
    pub fn default_filename(&self) -> String {
        match self {
            ToolRequest::Merge { files } => {
                let base = files.first().map(Upload::base_name).unwrap_or("documents");
                format!("{}_merged.pdf", base)
            }
            ToolRequest::Split { file, method } => {
                let base = file.base_name();
                match method {
                    SplitMethod::PagesPerFile(_) => format!("{}_split.zip", base),
                    SplitMethod::PageRange { start, end } => {
                        format!("{}_pages_{}_to_{}.pdf", base, start, end)
                    }
                    SplitMethod::ExtractPages(spec) => {
                        let compact: String = spec
                            .chars()
                            .filter(|c| !c.is_whitespace())
                            .map(|c| if c == ',' { '_' } else { c })
                            .collect();
                        format!("{}_pages_{}.pdf", base, compact)
                    }
                }
            }
            ToolRequest::Compress { file } => format!("{}_compressed.pdf", file.base_name()),
            ToolRequest::Unlock { file, .. } => format!("{}_unlocked.pdf", file.base_name()),
            ToolRequest::Rotate { file, .. } => format!("{}_rotado.pdf", file.base_name()),
            ToolRequest::ImagesToPdf { .. } => CONVERTED_IMAGES_FILENAME.to_string(),
            ToolRequest::CheckStatus { file } => format!("{}.json", file.base_name()),
        }
    }
}

/// `{"0": 90, "1": 0}`: zero-based page index to final angle
pub fn rotations_json(rotations: &PageRotations) -> String {
    let map: serde_json::Map<String, serde_json::Value> = rotations
        .iter()
        .map(|(index, angle)| (index.to_string(), (*angle).into()))
        .collect();
    serde_json::Value::Object(map).to_string()
}

fn layout_fields(layout: &ImageLayout) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        (FIELD_PAGE_SIZE, layout.page_size.as_str().to_string()),
        (FIELD_ORIENTATION, layout.orientation.as_str().to_string()),
        (FIELD_MARGINS, layout.margins.as_str().to_string()),
        (FIELD_IMAGE_FIT, layout.image_fit.as_str().to_string()),
    ];
    if let Margins::Custom {
        top,
        bottom,
        left,
        right,
    } = layout.margins
    {
        fields.push((FIELD_MARGIN_TOP, top.to_string()));
        fields.push((FIELD_MARGIN_BOTTOM, bottom.to_string()));
        fields.push((FIELD_MARGIN_LEFT, left.to_string()));
        fields.push((FIELD_MARGIN_RIGHT, right.to_string()));
    }
    fields
}

/// Absolute URL of `endpoint` under the backend base URL
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Suggested filename from a `Content-Disposition` header value
///
/// # Examples
/// ```
/// use pdftools_core::backend::content_disposition_filename;
///
/// assert_eq!(
///     content_disposition_filename(r#"attachment; filename="report_pages_1-3.pdf""#),
///     Some("report_pages_1-3.pdf".to_string())
/// );
/// assert_eq!(content_disposition_filename("inline"), None);
/// ```
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let captures = DISPOSITION_FILENAME.captures(header)?;
    let name: String = captures[1]
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect();
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// User-facing message from a failed response body
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

/// Turn a non-success response into a [`PdfToolsError::Backend`]
pub fn backend_error(status: u16, body: &[u8]) -> PdfToolsError {
    PdfToolsError::Backend {
        status,
        message: error_message(body),
    }
}

/// Answer of the status check endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfStatus {
    Protected,
    Unprotected,
    /// The backend could not read the file
    Unreadable(String),
}

impl PdfStatus {
    /// `None` when the backend could not tell
    pub fn is_protected(&self) -> Option<bool> {
        match self {
            PdfStatus::Protected => Some(true),
            PdfStatus::Unprotected => Some(false),
            PdfStatus::Unreadable(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    message: Option<String>,
    data: Option<StatusData>,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    #[serde(default)]
    is_encrypted: bool,
    error: Option<String>,
}

/// Parse the JSON body returned by `check-pdf-status/`
pub fn parse_status(body: &[u8]) -> Result<PdfStatus, PdfToolsError> {
    let body: StatusBody = serde_json::from_slice(body)
        .map_err(|e| PdfToolsError::InvalidResponse(format!("status body: {}", e)))?;

    if body.status != "success" {
        return Err(PdfToolsError::Backend {
            status: 200,
            message: body
                .message
                .unwrap_or_else(|| "Failed to check the PDF status".to_string()),
        });
    }

    let data = body
        .data
        .ok_or_else(|| PdfToolsError::InvalidResponse("status body has no data".into()))?;

    Ok(match data.error {
        Some(error) => PdfStatus::Unreadable(error),
        None if data.is_encrypted => PdfStatus::Protected,
        None => PdfStatus::Unprotected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upload(name: &str) -> Upload {
        Upload::new(name, b"%PDF-1.7".to_vec())
    }

    #[test]
    fn test_split_fields_per_method() {
        let cases = [
            (
                SplitMethod::PagesPerFile(3),
                vec![("split_method", "pages_per_file"), ("pages_per_file", "3")],
            ),
            (
                SplitMethod::PageRange { start: 2, end: 9 },
                vec![
                    ("split_method", "page_range"),
                    ("start_page", "2"),
                    ("end_page", "9"),
                ],
            ),
            (
                SplitMethod::ExtractPages("1-3, 5".into()),
                vec![
                    ("split_method", "extract_pages"),
                    ("pages_specification", "1-3, 5"),
                ],
            ),
        ];

        for (method, expected) in cases {
            let request = ToolRequest::Split {
                file: upload("a.pdf"),
                method,
            };
            let fields: Vec<(&str, String)> = request.fields();
            let expected: Vec<(&str, String)> = expected
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect();
            assert_eq!(fields, expected);
        }
    }

    #[test]
    fn test_extract_normalizes_specification() {
        let method = SplitMethod::extract("5, 1-3, 2", 10).unwrap();
        assert_eq!(method, SplitMethod::ExtractPages("1-3, 5".into()));
        assert!(SplitMethod::extract("11", 10).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_requests() {
        let split = |method| ToolRequest::Split {
            file: upload("a.pdf"),
            method,
        };
        assert!(split(SplitMethod::PagesPerFile(0)).validate().is_err());
        assert!(split(SplitMethod::PageRange { start: 4, end: 2 }).validate().is_err());
        assert!(split(SplitMethod::PageRange { start: 0, end: 2 }).validate().is_err());
        assert!(split(SplitMethod::ExtractPages("  ".into())).validate().is_err());
        assert!(split(SplitMethod::PageRange { start: 2, end: 2 }).validate().is_ok());

        let merge = ToolRequest::Merge {
            files: vec![upload("a.pdf")],
        };
        assert!(merge.validate().is_err());

        let unlock = ToolRequest::Unlock {
            file: upload("a.pdf"),
            password: String::new(),
        };
        assert!(unlock.validate().is_err());
    }

    #[test]
    fn test_files_use_tool_field_names() {
        let merge = ToolRequest::Merge {
            files: vec![upload("a.pdf"), upload("b.pdf")],
        };
        let names: Vec<_> = merge.files().iter().map(|(f, u)| (*f, u.name.clone())).collect();
        assert_eq!(
            names,
            vec![
                ("pdf_files", "a.pdf".to_string()),
                ("pdf_files", "b.pdf".to_string())
            ]
        );

        let unlock = ToolRequest::Unlock {
            file: upload("a.pdf"),
            password: "secret".into(),
        };
        assert_eq!(unlock.files()[0].0, "pdf_file");
        assert_eq!(unlock.fields(), vec![("password", "secret".to_string())]);
        assert_eq!(unlock.endpoint(), "desbloquear/");
    }

    #[test]
    fn test_default_filenames() {
        let file = upload("docs/Report.PDF");
        assert_eq!(file.base_name(), "Report");

        let extract = ToolRequest::Split {
            file: file.clone(),
            method: SplitMethod::ExtractPages("1-3, 5".into()),
        };
        assert_eq!(extract.default_filename(), "Report_pages_1-3_5.pdf");

        let range = ToolRequest::Split {
            file: file.clone(),
            method: SplitMethod::PageRange { start: 2, end: 4 },
        };
        assert_eq!(range.default_filename(), "Report_pages_2_to_4.pdf");

        let chunks = ToolRequest::Split {
            file: file.clone(),
            method: SplitMethod::PagesPerFile(2),
        };
        assert_eq!(chunks.default_filename(), "Report_split.zip");

        assert_eq!(
            ToolRequest::Compress { file }.default_filename(),
            "Report_compressed.pdf"
        );
    }

    #[test]
    fn test_rotate_request() {
        let rotations: PageRotations = [(0, 90), (1, 0), (2, 270)].into_iter().collect();
        let request = ToolRequest::Rotate {
            file: upload("scan.pdf"),
            rotations,
        };
        assert_eq!(request.endpoint(), "rotar/");
        assert_eq!(request.files()[0].0, "pdf_file");
        assert_eq!(
            request.fields(),
            vec![("page_rotations", r#"{"0":90,"1":0,"2":270}"#.to_string())]
        );
        assert_eq!(request.default_filename(), "scan_rotado.pdf");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_rotate_validation() {
        let rotate = |rotations: &[(u32, u32)]| ToolRequest::Rotate {
            file: upload("scan.pdf"),
            rotations: rotations.iter().copied().collect(),
        };
        assert!(matches!(
            rotate(&[]).validate(),
            Err(PdfToolsError::InvalidRequest(m)) if m == "No pages to rotate"
        ));
        assert!(matches!(
            rotate(&[(0, 0), (1, 45)]).validate(),
            Err(PdfToolsError::InvalidRequest(m)) if m == "Page 2 has an invalid rotation of 45 degrees"
        ));
        assert!(rotate(&[(0, 360)]).validate().is_err());
    }

    #[test]
    fn test_images_request_fields() {
        let images = vec![
            Upload::new("b.png", vec![1]),
            Upload::new("a.JPG", vec![2]),
        ];
        let request = ToolRequest::ImagesToPdf {
            images,
            layout: ImageLayout::default(),
        };
        assert_eq!(request.endpoint(), "imagen/");
        assert_eq!(
            request.fields(),
            vec![
                ("page_size", "A4".to_string()),
                ("orientation", "portrait".to_string()),
                ("margins", "medium".to_string()),
                ("image_fit", "fit".to_string()),
            ]
        );
        let files: Vec<_> = request
            .files()
            .iter()
            .map(|(field, u)| (*field, u.name.as_str(), u.content_type()))
            .collect();
        assert_eq!(
            files,
            vec![
                ("image_files", "b.png", "image/png"),
                ("image_files", "a.JPG", "image/jpeg"),
            ]
        );
        assert_eq!(request.default_filename(), "imagenes_convertidas.pdf");
    }

    #[test]
    fn test_images_custom_margins_are_sent() {
        let request = ToolRequest::ImagesToPdf {
            images: vec![Upload::new("a.png", vec![1])],
            layout: ImageLayout {
                margins: Margins::Custom {
                    top: 5,
                    bottom: 10,
                    left: 15,
                    right: 20,
                },
                ..ImageLayout::default()
            },
        };
        let fields = request.fields();
        assert_eq!(fields[2], ("margins", "custom".to_string()));
        assert_eq!(
            fields[4..].to_vec(),
            vec![
                ("margin_top", "5".to_string()),
                ("margin_bottom", "10".to_string()),
                ("margin_left", "15".to_string()),
                ("margin_right", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_images_validation() {
        let images = |names: &[&str]| ToolRequest::ImagesToPdf {
            images: names.iter().map(|n| Upload::new(*n, vec![0])).collect(),
            layout: ImageLayout::default(),
        };
        assert!(images(&[]).validate().is_err());
        assert!(matches!(
            images(&["a.png", "notes.txt"]).validate(),
            Err(PdfToolsError::InvalidRequest(m)) if m == "notes.txt is not a supported image"
        ));
        assert!(images(&["a.png", "b.webp"]).validate().is_ok());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(upload("a.pdf").content_type(), "application/pdf");
        assert_eq!(upload("A.PDF").content_type(), "application/pdf");
        assert_eq!(upload("photo.jpeg").content_type(), "image/jpeg");
        assert_eq!(upload("README").content_type(), "application/octet-stream");
        assert!(upload("scan.tiff").is_image());
        assert!(!upload("scan.tiff").is_pdf());
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8000/", "split/"),
            "http://localhost:8000/split/"
        );
        assert_eq!(endpoint_url("https://pdf.example", "join/"), "https://pdf.example/join/");
    }

    #[test]
    fn test_content_disposition_filename() {
        assert_eq!(
            content_disposition_filename(r#"attachment; filename="a_b.pdf""#),
            Some("a_b.pdf".into())
        );
        assert_eq!(
            content_disposition_filename("attachment; filename=plain.zip"),
            Some("plain.zip".into())
        );
        assert_eq!(
            content_disposition_filename("attachment; filename='single.pdf'; size=10"),
            Some("single.pdf".into())
        );
        assert_eq!(content_disposition_filename("attachment"), None);
        assert_eq!(content_disposition_filename(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(br#"{"status":"error","message":"Wrong password"}"#),
            "Wrong password"
        );
        assert_eq!(error_message(b"<html>500</html>"), GENERIC_ERROR);
        assert_eq!(error_message(br#"{"status":"error"}"#), GENERIC_ERROR);

        match backend_error(400, br#"{"message":"Bad spec"}"#) {
            PdfToolsError::Backend { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad spec");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_status() {
        let protected = br#"{"status":"success","data":{"is_encrypted":true}}"#;
        assert_eq!(parse_status(protected).unwrap(), PdfStatus::Protected);

        let open = br#"{"status":"success","data":{"is_encrypted":false}}"#;
        assert_eq!(parse_status(open).unwrap(), PdfStatus::Unprotected);

        let unreadable = br#"{"status":"success","data":{"error":"bad xref"}}"#;
        assert_eq!(
            parse_status(unreadable).unwrap(),
            PdfStatus::Unreadable("bad xref".into())
        );

        let failed = br#"{"status":"error","message":"No file"}"#;
        assert!(matches!(
            parse_status(failed),
            Err(PdfToolsError::Backend { message, .. }) if message == "No file"
        ));

        assert!(matches!(
            parse_status(b"nope"),
            Err(PdfToolsError::InvalidResponse(_))
        ));
    }
}
