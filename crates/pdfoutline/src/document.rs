//! Top-level PDF document type.

use std::path::Path;

use pdfoutline_core::TextLine;
use pdfoutline_parse::{
    BackendError, ExtractOptions, LopdfBackend, PageLines, PdfBackend, drop_running_margins,
    extract_pages,
};

/// A PDF document opened for outline extraction.
///
/// All pages are interpreted on open; the document itself is not retained.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("report.pdf", &ExtractOptions::default())?;
/// let outline = outline_document(&pdf.lines(), &OutlineOptions::default());
/// ```
#[derive(Debug, Clone)]
pub struct Pdf {
    pages: Vec<PageLines>,
    options: ExtractOptions,
}

impl Pdf {
    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Encrypted`] for encrypted documents and
    /// [`BackendError::Parse`] if the bytes are not a valid PDF.
    pub fn open(bytes: &[u8], options: &ExtractOptions) -> Result<Self, BackendError> {
        let doc = LopdfBackend::open(bytes)?;
        let pages = extract_pages::<LopdfBackend>(&doc, options)?;
        Ok(Self {
            pages,
            options: options.clone(),
        })
    }

    /// Open a PDF document from a file path.
    pub fn open_file(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assembled lines of every page, running headers and footers included.
    pub fn pages(&self) -> &[PageLines] {
        &self.pages
    }

    /// Lines for the outline pipeline: every page in order, with running
    /// headers and footers removed from pages after the first.
    pub fn lines(&self) -> Vec<TextLine> {
        self.pages
            .iter()
            .flat_map(|page| {
                drop_running_margins(
                    page.lines.clone(),
                    page.media_box.height(),
                    self.options.header_footer_margin,
                )
            })
            .collect()
    }

    /// Plain text lines of each page, for section segmentation.
    pub fn page_texts(&self) -> Vec<Vec<String>> {
        self.pages.iter().map(PageLines::texts).collect()
    }

    /// Whether any page produced a line of text.
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|page| !page.lines.is_empty())
    }
}
