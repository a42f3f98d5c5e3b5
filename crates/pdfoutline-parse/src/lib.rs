//! pdfoutline-parse: PDF parsing backend and text-only content stream interpreter.
//!
//! Turns PDF pages into the [`TextLine`](pdfoutline_core::TextLine)s the
//! outline pipeline consumes. Parsing goes through the [`PdfBackend`] trait;
//! [`LopdfBackend`] is the implementation.

pub mod backend;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod handler;
pub mod interpreter;
pub mod lines;
pub mod lopdf_backend;
pub mod options;

pub use backend::{MediaBox, PdfBackend};
pub use error::BackendError;
pub use handler::{TextHandler, TextRun};
pub use lines::{PageLines, assemble_lines, drop_running_margins, extract_pages};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use options::ExtractOptions;
pub use pdfoutline_core;
