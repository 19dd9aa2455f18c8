//! Page specification parsing and formatting
//!
//! A page specification is what a user types into the "pages to extract"
//! field: comma-separated single pages and inclusive ranges, e.g. `"1-3, 5, 8-10"`.

use crate::error::ValidationError;
use std::collections::BTreeSet;

/// Parse a page specification into sorted, unique page numbers (1-indexed)
///
/// Fails on the first invalid token. Blank tokens are ignored, so `"1,,2"`
/// is accepted, but a specification with no pages at all is an error.
///
/// # Examples
/// ```
/// use pdftools_core::ranges::parse_page_spec;
///
/// assert_eq!(parse_page_spec("1-3,5", 10).unwrap(), vec![1, 2, 3, 5]);
/// assert_eq!(parse_page_spec("2,2,3,1", 10).unwrap(), vec![1, 2, 3]);
/// assert!(parse_page_spec("5-3", 10).is_err());
/// ```
pub fn parse_page_spec(spec: &str, total_pages: u32) -> Result<Vec<u32>, ValidationError> {
    let mut pages = BTreeSet::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((start, end)) = token.split_once('-') {
            let invalid = || ValidationError::InvalidRange {
                token: token.to_string(),
            };
            let start: i64 = start.trim().parse().map_err(|_| invalid())?;
            let end: i64 = end.trim().parse().map_err(|_| invalid())?;

            if start > end || start < 1 || end > i64::from(total_pages) {
                return Err(invalid());
            }

            // Bounds checked above, both fit in the document's page range
            pages.extend(start as u32..=end as u32);
        } else {
            let page: i64 = match token.parse() {
                Ok(page) => page,
                // A number too large for i64 is still a page past the end
                Err(_) if token.bytes().all(|b| b.is_ascii_digit()) => i64::MAX,
                Err(_) => {
                    return Err(ValidationError::InvalidRange {
                        token: token.to_string(),
                    })
                }
            };

            if page < 1 || page > i64::from(total_pages) {
                return Err(ValidationError::OutOfRange { page, total_pages });
            }

            pages.insert(page as u32);
        }
    }

    if pages.is_empty() {
        return Err(ValidationError::EmptyResult);
    }

    Ok(pages.into_iter().collect())
}

/// Collapse ascending, deduplicated page numbers into the shortest specification
///
/// `[1, 2, 3, 5, 7, 8]` becomes `"1-3, 5, 7-8"`; an empty input gives `""`.
pub fn format_page_spec(pages: &[u32]) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();

    for &page in pages {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(page) => *end = page,
            _ => runs.push((page, page)),
        }
    }

    runs.iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
