//! Text line records and the style flags attached to them.

use bitflags::bitflags;

bitflags! {
    /// Style bits of one text run.
    ///
    /// Bit positions follow the common span-flag layout used by PDF text
    /// extractors, so flags produced by other tools can be passed through
    /// unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpanFlags: u32 {
        const SUPERSCRIPT = 1;
        const ITALIC = 1 << 1;
        const SERIF = 1 << 2;
        const MONOSPACE = 1 << 3;
        const BOLD = 1 << 4;
    }
}

/// One visually contiguous line of text on one page.
///
/// Coordinates use a top-left origin: `left` is the distance from the left
/// edge of the page, `top` the distance from the top edge (growing downward).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Whitespace-collapsed text, never empty.
    pub text: String,
    /// Page number (1-indexed).
    pub page: usize,
    /// Representative font size in points (mean of the constituent runs).
    pub font_size: f64,
    /// Left edge of the line.
    pub left: f64,
    /// Top edge of the line, measured from the top of the page.
    pub top: f64,
    /// Style flags of each constituent run.
    pub flags: Vec<SpanFlags>,
}

impl TextLine {
    /// Create a line, collapsing internal whitespace.
    ///
    /// Returns `None` when the text is empty after trimming or the font size
    /// is not a positive number.
    pub fn new(
        text: &str,
        page: usize,
        font_size: f64,
        left: f64,
        top: f64,
        flags: Vec<SpanFlags>,
    ) -> Option<Self> {
        let text = collapse_whitespace(text);
        if text.is_empty() || !(font_size > 0.0) {
            return None;
        }
        Some(Self {
            text,
            page,
            font_size,
            left,
            top,
            flags,
        })
    }

    /// Whether any constituent run is bold.
    pub fn is_bold(&self) -> bool {
        self.flags.iter().any(|f| f.contains(SpanFlags::BOLD))
    }
}

/// A [`TextLine`] decorated with the signals derived by
/// [`annotate_lines`](crate::annotate_lines).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotatedLine {
    pub line: TextLine,
    /// Position of the line in the document's line sequence.
    pub index: usize,
    /// 1 = largest distinct rounded font size in the document.
    pub font_size_rank: usize,
    /// Vertical distance to the previous line on the same page.
    pub y_gap_above: f64,
    pub is_all_caps: bool,
    pub starts_with_numbering: bool,
    pub is_bold: bool,
}

impl AnnotatedLine {
    pub fn text(&self) -> &str {
        &self.line.text
    }

    pub fn page(&self) -> usize {
        self.line.page
    }
}

/// An annotated line that survived heading scoring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingCandidate {
    pub line: AnnotatedLine,
    pub heading_score: i32,
}

/// Visual style used to cluster heading candidates into levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleKey {
    pub font_size_rank: usize,
    pub is_bold: bool,
    pub indent_bucket: i64,
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
