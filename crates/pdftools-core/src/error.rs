use thiserror::Error;

/// Category of a page specification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    InvalidRange,
    OutOfRange,
    EmptyResult,
}

/// Why a page specification was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid range: {token}")]
    InvalidRange { token: String },

    #[error("Page {page} is out of range (1-{total_pages})")]
    OutOfRange { page: i64, total_pages: u32 },

    #[error("No valid pages found in the specification")]
    EmptyResult,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::InvalidRange { .. } => ValidationKind::InvalidRange,
            ValidationError::OutOfRange { .. } => ValidationKind::OutOfRange,
            ValidationError::EmptyResult => ValidationKind::EmptyResult,
        }
    }
}

#[derive(Error, Debug)]
pub enum PdfToolsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read PDF: {0}")]
    Document(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("A request is already in progress")]
    Busy,

    #[error("No document loaded")]
    NoDocument,
}
