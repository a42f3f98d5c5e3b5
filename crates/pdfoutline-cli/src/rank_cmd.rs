use std::path::Path;

use pdfoutline::{CollectionRequest, analyze_collection};

use crate::shared::load_config;

/// Local time in ISO 8601 form with microseconds.
fn processing_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn run(
    input_json: &Path,
    pdf_dir: &Path,
    output_json: &Path,
    max_sentences: Option<usize>,
    config: Option<&Path>,
) -> Result<(), i32> {
    let config = load_config(config)?;
    let mut options = config.rank;
    if let Some(n) = max_sentences {
        options.max_sentences = n;
    }

    let request = CollectionRequest::from_file(input_json).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    if !pdf_dir.is_dir() {
        eprintln!("Error: not a directory: {}", pdf_dir.display());
        return Err(1);
    }

    let report = analyze_collection(&request, pdf_dir, &options, processing_timestamp());
    let json = serde_json::to_string_pretty(&report).map_err(|e| {
        eprintln!("Error: failed to serialize report: {e}");
        1
    })?;

    if let Some(parent) = output_json.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            eprintln!("Error: cannot create {}: {e}", parent.display());
            1
        })?;
    }
    std::fs::write(output_json, json).map_err(|e| {
        eprintln!("Error: cannot write {}: {e}", output_json.display());
        1
    })?;

    println!(
        "✓ ranked {} section(s) from {} document(s) into {}",
        report.extracted_sections.len(),
        request.documents.len(),
        output_json.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_iso_like() {
        let ts = processing_timestamp();
        assert_eq!(ts.len(), 26);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }
}
