//! pdfoutline: extract document outlines from PDFs and rank their sections
//! for a persona.
//!
//! This is the public API facade crate. It re-exports types from
//! pdfoutline-core and uses pdfoutline-parse for PDF reading.
//!
//! # Architecture
//!
//! - **pdfoutline-core**: Backend-independent types and algorithms
//! - **pdfoutline-parse**: PDF parsing and text line extraction
//! - **pdfoutline** (this crate): Pipelines, schema validation and configuration
//!
//! # Example
//!
//! ```ignore
//! let config = PipelineConfig::default();
//! let schema = OutlineSchema::builtin()?;
//! let report = run_outline_batch(Path::new("input"), Path::new("output"), &config, &schema)?;
//! println!("{} written, {} failed", report.succeeded(), report.failed());
//! ```

mod batch;
mod collection;
mod config;
mod document;
mod error;
mod schema;

pub use batch::{BatchReport, DocumentOutcome, extract_outline_from_file, list_pdfs, run_outline_batch};
pub use collection::{
    CollectionMetadata, CollectionReport, CollectionRequest, DocumentRef, ExtractedSection,
    JobToBeDone, Persona, SubsectionAnalysis, analyze_collection, document_sections,
    rank_collection,
};
pub use config::PipelineConfig;
pub use document::Pdf;
pub use error::PipelineError;
pub use schema::OutlineSchema;

pub use pdfoutline_core::{
    DocumentOutline, FeatureParams, HeadingLevel, HeadingParams, OutlineEntry, OutlineOptions,
    OutlineParams, RankOptions, Section, TextLine, outline_document,
};
pub use pdfoutline_parse::{BackendError, ExtractOptions};

pub use pdfoutline_core;
pub use pdfoutline_parse;
