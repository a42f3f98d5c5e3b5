//! PDF parsing backend trait.

use crate::handler::TextHandler;
use crate::options::ExtractOptions;

/// The page rectangle in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl MediaBox {
    /// Normalise corner order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Trait abstracting the PDF operations text extraction needs.
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::get_page(&doc, index)?;
///     let media_box = MyBackend::page_media_box(&doc, &page)?;
///     MyBackend::interpret_page(&doc, &page, &mut runs, &options)?;
/// }
/// ```
pub trait PdfBackend {
    type Document;
    type Page;
    type Error: std::error::Error;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable, unencrypted PDF.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's MediaBox, inherited through the page tree when needed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error>;

    /// Interpret the page's content streams, reporting text runs to `handler`.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn TextHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
