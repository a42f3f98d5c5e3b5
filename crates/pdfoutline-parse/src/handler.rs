//! Callback interface between the content stream interpreter and its consumers.

use pdfoutline_core::SpanFlags;

/// One shown string (`Tj`, `TJ`, `'`, `"`) after decoding and positioning.
///
/// Positions are in PDF user space (bottom-left origin).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Left edge of the first glyph.
    pub x: f64,
    /// Baseline of the run.
    pub baseline: f64,
    /// Horizontal extent of the shown glyphs.
    pub width: f64,
    /// Font size scaled by the text rendering matrix.
    pub font_size: f64,
    pub flags: SpanFlags,
}

impl TextRun {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Receives text runs as the interpreter produces them, in content stream order.
pub trait TextHandler {
    fn on_run(&mut self, run: TextRun);
}

impl TextHandler for Vec<TextRun> {
    fn on_run(&mut self, run: TextRun) {
        self.push(run);
    }
}
