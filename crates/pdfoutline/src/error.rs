//! Error types for the outline and collection pipelines.

use std::path::{Path, PathBuf};

use pdfoutline_parse::BackendError;
use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The PDF could not be read, or it holds no extractable text.
    #[error("extraction failed: {0}")]
    Extraction(#[from] BackendError),

    /// A built outline does not match the output schema. Each entry names
    /// the offending instance path and the violation.
    #[error("schema validation failed: {}", .0.join("; "))]
    SchemaValidation(Vec<String>),

    /// The input directory holds no PDF files.
    #[error("No PDFs found in {}", .0.display())]
    EmptyInput(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration, schema or request file.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Adapter for `map_err` that attaches the file path to an I/O error.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
