use std::path::Path;

use pdfoutline::{OutlineSchema, Pdf, PipelineConfig};

/// Load the pipeline configuration, or the defaults when no file is given.
///
/// Returns `Err(1)` with a message printed to stderr if the file cannot be
/// read or is not a valid configuration.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, i32> {
    match path {
        Some(path) => PipelineConfig::from_file(path).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok(PipelineConfig::default()),
    }
}

/// Load a schema file, or the built-in outline schema.
pub fn load_schema(path: Option<&Path>) -> Result<OutlineSchema, i32> {
    let schema = match path {
        Some(path) => OutlineSchema::from_file(path),
        None => OutlineSchema::builtin(),
    };
    schema.map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Open a PDF file with user-friendly error messages.
pub fn open_pdf(file: &Path, config: &PipelineConfig) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file, &config.extract).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}
