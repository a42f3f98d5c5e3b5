//! Persona-driven section ranking over a collection of PDFs.

use std::path::Path;

use pdfoutline_core::{
    RankOptions, Section, extract_keywords, refine_text, segment_sections, select_top_sections,
};
use pdfoutline_parse::ExtractOptions;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::batch::isolate_document;
use crate::document::Pdf;
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
}

/// Input of the collection pipeline. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
    /// Documents in the order they are reported.
    pub documents: Vec<DocumentRef>,
}

impl CollectionRequest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PipelineError::io(path))?;
        serde_json::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }

    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: usize,
}

/// Output of the collection pipeline. `extracted_sections[i]` and
/// `subsection_analysis[i]` describe the same section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub metadata: CollectionMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

/// Segment one PDF of the collection into sections.
pub fn document_sections(pdf_dir: &Path, filename: &str) -> Result<Vec<Section>, PipelineError> {
    let path = pdf_dir.join(filename);
    isolate_document(&path, || {
        let pdf = Pdf::open_file(&path, &ExtractOptions::default())?;
        Ok(segment_sections(filename, &pdf.page_texts()))
    })
}

/// Pick each document's most relevant section for the persona and task,
/// rank those sections against each other and refine their text.
///
/// Documents are read in parallel. A document that cannot be read is
/// logged and contributes nothing.
pub fn analyze_collection(
    request: &CollectionRequest,
    pdf_dir: &Path,
    options: &RankOptions,
    timestamp: impl Into<String>,
) -> CollectionReport {
    let per_document: Vec<Vec<Section>> = request
        .documents
        .par_iter()
        .map(|doc| {
            document_sections(pdf_dir, &doc.filename).unwrap_or_else(|error| {
                tracing::warn!(document = %doc.filename, %error, "skipping document");
                Vec::new()
            })
        })
        .collect();
    tracing::debug!(
        documents = per_document.len(),
        sections = per_document.iter().map(Vec::len).sum::<usize>(),
        "segmented collection"
    );
    rank_collection(request, &per_document, options, timestamp.into())
}

/// The ranking half of [`analyze_collection`], over already segmented
/// documents (one entry per requested document, in request order).
pub fn rank_collection(
    request: &CollectionRequest,
    per_document: &[Vec<Section>],
    options: &RankOptions,
    timestamp: String,
) -> CollectionReport {
    let keywords = extract_keywords(&format!(
        "{} {}",
        request.persona.role, request.job_to_be_done.task
    ));
    let top = select_top_sections(per_document, &keywords);

    let extracted_sections = top
        .iter()
        .map(|ranked| ExtractedSection {
            document: ranked.section.document.clone(),
            section_title: ranked.section.section_title.clone(),
            importance_rank: ranked.importance_rank,
            page_number: ranked.section.page_number,
        })
        .collect();
    let subsection_analysis = top
        .iter()
        .map(|ranked| SubsectionAnalysis {
            document: ranked.section.document.clone(),
            refined_text: refine_text(&ranked.section.text, &keywords, options),
            page_number: ranked.section.page_number,
        })
        .collect();

    CollectionReport {
        metadata: CollectionMetadata {
            input_documents: request.filenames(),
            persona: request.persona.role.clone(),
            job_to_be_done: request.job_to_be_done.task.clone(),
            processing_timestamp: timestamp,
        },
        extracted_sections,
        subsection_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: &str, task: &str, files: &[&str]) -> CollectionRequest {
        CollectionRequest {
            persona: Persona { role: role.into() },
            job_to_be_done: JobToBeDone { task: task.into() },
            documents: files.iter().map(|f| DocumentRef { filename: f.to_string() }).collect(),
        }
    }

    fn section(document: &str, title: &str, text: &str, page: usize) -> Section {
        Section {
            section_title: title.into(),
            text: text.into(),
            page_number: page,
            document: document.into(),
        }
    }

    #[test]
    fn request_tolerates_extra_fields() {
        let json = r#"{
            "challenge_info": { "challenge_id": "round_1b_002" },
            "documents": [ { "filename": "a.pdf", "title": "A" }, { "filename": "b.pdf" } ],
            "persona": { "role": "Travel Planner" },
            "job_to_be_done": { "task": "Plan a trip" }
        }"#;
        let request: CollectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.filenames(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(request.persona.role, "Travel Planner");
    }

    #[test]
    fn report_ranks_best_section_first_regardless_of_document_order() {
        let req = request("Investor", "evaluate quarterly risk", &["weak.pdf", "strong.pdf"]);
        let per_document = vec![
            vec![section("weak.pdf", "GARDENING NOTES", "Tomatoes need sun and water daily.", 1)],
            vec![
                section("strong.pdf", "1 Intro", "Welcome to the annual filing for shareholders.", 1),
                section(
                    "strong.pdf",
                    "2 Risk",
                    "Quarterly risk review.\nRisk Factors: currency exposure; interest rate exposure; regulatory exposure;",
                    3,
                ),
            ],
        ];
        let report = rank_collection(&req, &per_document, &RankOptions::default(), "ts".into());

        assert_eq!(report.metadata.input_documents, vec!["weak.pdf", "strong.pdf"]);
        assert_eq!(report.metadata.processing_timestamp, "ts");
        assert_eq!(report.extracted_sections.len(), 2);
        let first = &report.extracted_sections[0];
        assert_eq!(
            (first.document.as_str(), first.section_title.as_str(), first.importance_rank, first.page_number),
            ("strong.pdf", "2 Risk", 1, 3)
        );
        assert_eq!(report.extracted_sections[1].importance_rank, 2);
        assert_eq!(report.subsection_analysis[0].document, "strong.pdf");
        assert!(report.subsection_analysis[0]
            .refined_text
            .contains("Risk Factors: currency exposure; interest rate exposure; regulatory exposure;"));
    }

    #[test]
    fn unreadable_documents_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.pdf"), b"not a pdf").unwrap();
        let req = request("Chef", "cook dinner", &["bad.pdf", "missing.pdf"]);
        let report = analyze_collection(&req, dir.path(), &RankOptions::default(), "now");
        assert_eq!(report.metadata.input_documents.len(), 2);
        assert!(report.extracted_sections.is_empty());
        assert!(report.subsection_analysis.is_empty());
    }

    #[test]
    fn report_serializes_in_output_shape() {
        let req = request("Chef", "cook", &[]);
        let report = rank_collection(&req, &[], &RankOptions::default(), "2026-01-01T00:00:00".into());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["metadata"]["persona"], "Chef");
        assert_eq!(value["metadata"]["job_to_be_done"], "cook");
        assert!(value["extracted_sections"].as_array().unwrap().is_empty());
        assert!(value["subsection_analysis"].is_array());
    }
}
