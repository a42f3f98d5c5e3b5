//! The outline pipeline over a directory of PDFs.

use std::fs;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use pdfoutline_core::{DocumentOutline, outline_document};
use pdfoutline_parse::BackendError;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::document::Pdf;
use crate::error::PipelineError;
use crate::schema::OutlineSchema;

/// Extract the outline of one PDF file.
///
/// # Errors
///
/// Returns [`PipelineError::Extraction`] if the file cannot be parsed or
/// has no extractable text.
pub fn extract_outline_from_file(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<DocumentOutline, PipelineError> {
    let pdf = Pdf::open_file(path.as_ref(), &config.extract)?;
    let lines = pdf.lines();
    if lines.is_empty() {
        return Err(BackendError::NoText.into());
    }
    tracing::debug!(path = %path.as_ref().display(), lines = lines.len(), "extracted lines");
    Ok(outline_document(&lines, &config.outline_options()))
}

/// Result of processing one document of a batch.
#[derive(Debug)]
pub enum DocumentOutcome {
    Written {
        input: PathBuf,
        output: PathBuf,
        headings: usize,
    },
    Failed {
        input: PathBuf,
        error: PipelineError,
    },
}

impl DocumentOutcome {
    pub fn input(&self) -> &Path {
        match self {
            DocumentOutcome::Written { input, .. } | DocumentOutcome::Failed { input, .. } => input,
        }
    }

    /// File name of the input, for reporting.
    pub fn name(&self) -> String {
        self.input()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input().display().to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DocumentOutcome::Written { .. })
    }
}

/// Per-document outcomes of [`run_outline_batch`], in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// `*.pdf` files directly inside `dir`, sorted by path.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir).map_err(PipelineError::io(dir))? {
        let path = entry.map_err(PipelineError::io(dir))?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Write one `<stem>.json` outline per PDF in `input_dir` to `output_dir`.
///
/// Documents run on a pool of `min(max_workers, document count)` threads.
/// A failing document is recorded in the report and never leaves a file
/// behind; it does not stop the others.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] when `input_dir` holds no PDFs, and
/// an error if either directory is unusable or the pool cannot start.
pub fn run_outline_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    schema: &OutlineSchema,
) -> Result<BatchReport, PipelineError> {
    let inputs = list_pdfs(input_dir)?;
    if inputs.is_empty() {
        return Err(PipelineError::EmptyInput(input_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir).map_err(PipelineError::io(output_dir))?;

    let workers = config.max_workers.max(1).min(inputs.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| PipelineError::Config(format!("failed to start worker pool: {e}")))?;
    tracing::debug!(documents = inputs.len(), workers, "starting outline batch");

    let outcomes: Vec<DocumentOutcome> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let result =
                    isolate_document(input, || write_outline(input, output_dir, config, schema));
                match result {
                    Ok((output, headings)) => DocumentOutcome::Written {
                        input: input.clone(),
                        output,
                        headings,
                    },
                    Err(error) => {
                        tracing::warn!(document = %input.display(), %error, "outline extraction failed");
                        DocumentOutcome::Failed {
                            input: input.clone(),
                            error,
                        }
                    }
                }
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "outline batch finished"
    );
    Ok(report)
}

/// Run one document's work, reporting a panic in the PDF stack as an
/// extraction error for that document.
pub(crate) fn isolate_document<T>(
    input: &Path,
    task: impl FnOnce() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(BackendError::Parse(format!(
            "PDF parser panicked on {}: {reason}",
            input.display()
        ))
        .into())
    })
}

fn write_outline(
    input: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    schema: &OutlineSchema,
) -> Result<(PathBuf, usize), PipelineError> {
    let outline = extract_outline_from_file(input, config)?;
    let value = serde_json::to_value(&outline)?;
    schema.validate(&value)?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = output_dir.join(format!("{stem}.json"));
    write_atomically(&output, serde_json::to_string_pretty(&value)?.as_bytes())?;
    Ok((output, outline.outline.len()))
}

/// Write through a temporary sibling and rename, so a failure never leaves
/// a truncated file at `path`.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    if let Err(source) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(PipelineError::Io { path: tmp, source });
    }
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
