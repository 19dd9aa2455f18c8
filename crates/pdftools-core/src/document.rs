//! Local PDF inspection
//!
//! Reads just enough of a document to know how many pages it has before
//! anything is sent to the backend. Nothing here modifies the document.

use crate::error::PdfToolsError;
use lopdf::{Document, Object};
use serde::Serialize;

/// Limit on `/Parent` hops when looking up inherited attributes
const MAX_TREE_DEPTH: usize = 32;

/// Facts about a loaded PDF
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct PdfInfo {
    pub page_count: u32,
    /// Header version, e.g. "1.7"
    pub version: String,
    /// Informational only. Whether a password is required is decided by the
    /// backend status check.
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Cheap structural check: header present and `%%EOF` near the end
pub fn quick_validate(bytes: &[u8]) -> Result<(), PdfToolsError> {
    if bytes.len() < 8 {
        return Err(PdfToolsError::Document(
            "File too small to be a valid PDF".into(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfToolsError::Document(
            "Not a valid PDF file (missing %PDF- header)".into(),
        ));
    }

    let tail = &bytes[bytes.len().saturating_sub(1024)..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err(PdfToolsError::Document(
            "PDF appears truncated (missing %%EOF marker)".into(),
        ));
    }

    Ok(())
}

fn load(bytes: &[u8]) -> Result<Document, PdfToolsError> {
    if bytes.len() < 8 || !bytes.starts_with(b"%PDF-") {
        return Err(PdfToolsError::Document(
            "Not a valid PDF file (missing %PDF- header)".into(),
        ));
    }

    Document::load_mem(bytes).map_err(|e| PdfToolsError::Document(e.to_string()))
}

/// Parse the document and collect its [`PdfInfo`]
pub fn inspect_pdf(bytes: &[u8]) -> Result<PdfInfo, PdfToolsError> {
    let document = load(bytes)?;

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfToolsError::Document("PDF has no pages".into()));
    }

    let (title, author) = info_strings(&document);

    Ok(PdfInfo {
        page_count,
        version: header_version(bytes),
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
        title,
        author,
    })
}

/// Stored `/Rotate` of every page in order, inherited values included
pub fn page_rotations(bytes: &[u8]) -> Result<Vec<u32>, PdfToolsError> {
    let document = load(bytes)?;
    Ok(document
        .get_pages()
        .into_values()
        .map(|page_id| stored_rotation(&document, page_id))
        .collect())
}

fn stored_rotation(document: &Document, page_id: lopdf::ObjectId) -> u32 {
    let mut node = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let Some(dict) = node.and_then(|id| document.get_dictionary(id).ok()) else {
            break;
        };
        if let Ok(angle) = dict.get(b"Rotate").and_then(Object::as_i64) {
            return crate::rotation::normalize_angle(angle);
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    0
}

fn header_version(bytes: &[u8]) -> String {
    bytes
        .get(5..8)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

fn info_strings(document: &Document) -> (Option<String>, Option<String>) {
    let Some(info) = document
        .trailer
        .get(b"Info")
        .and_then(|o| o.as_reference())
        .ok()
        .and_then(|id| document.get_dictionary(id).ok())
    else {
        return (None, None);
    };

    let read = |key: &[u8]| {
        info.get(key)
            .and_then(|o| o.as_str())
            .ok()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .filter(|s| !s.is_empty())
    };

    (read(b"Title"), read(b"Author"))
}

/// Build an N-page PDF in memory for tests
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    use lopdf::{content::Content, content::Operation, Dictionary, Object, Stream};

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info = Dictionary::from_iter(vec![
        (
            "Title",
            Object::String(b"Quarterly report".to_vec(), lopdf::StringFormat::Literal),
        ),
        (
            "Author",
            Object::String(Vec::new(), lopdf::StringFormat::Literal),
        ),
    ]);
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
