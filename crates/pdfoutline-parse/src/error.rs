//! Error types for the PDF backend.

use thiserror::Error;

/// Error type for PDF parsing and text extraction.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// The document is encrypted; decryption is not supported.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document parsed but contains no extractable text.
    #[error("no extractable text in document")]
    NoText,
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}
