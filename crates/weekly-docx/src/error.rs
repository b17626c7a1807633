//! Error types for template loading, mutation, and saving.

use thiserror::Error;

/// Result type alias for document operations
pub type DocxResult<T> = Result<T, DocxError>;

#[derive(Error, Debug)]
pub enum DocxError {
    /// A required heading or header line is missing from the template. Fatal.
    #[error("Anchor not found in template: {0}")]
    AnchorNotFound(String),

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// A paragraph handle no longer refers to a paragraph in the document.
    #[error("Paragraph {0} is no longer in the document")]
    StaleParagraph(u64),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocxError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        DocxError::Xml(err.to_string())
    }
}
