//! Section segmentation of plain page text using title-line heuristics.

use std::sync::LazyLock;

use regex::Regex;

static CAPS_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s\-:]{5,}$").expect("valid caps title regex"));

static NUMBERED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[.)]?\s").expect("valid numbered title regex"));

/// Title of the single section emitted when no title line is found.
pub const FULL_DOCUMENT_TITLE: &str = "Full Document";

/// Title of the untitled text that precedes the first title line.
pub const PREAMBLE_TITLE: &str = "Preamble";

/// A titled run of body text within one document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub section_title: String,
    /// Body lines joined with `\n`.
    pub text: String,
    /// Page on which the section title appears (1-indexed).
    pub page_number: usize,
    /// Identifier of the source document (its file name).
    pub document: String,
}

/// Whether a line reads as a section title: all capitals (spaces, hyphens
/// and colons allowed) of at least six characters, or a leading integer
/// followed by an optional `.`/`)` and whitespace.
pub fn is_section_title(line: &str) -> bool {
    let trimmed = line.trim();
    CAPS_TITLE.is_match(trimmed) || NUMBERED_TITLE.is_match(trimmed)
}

struct OpenSection {
    title: Option<String>,
    page: usize,
    lines: Vec<String>,
}

impl OpenSection {
    fn close(self, document: &str, out: &mut Vec<Section>) {
        let text = self.lines.join("\n");
        if text.trim().is_empty() {
            return;
        }
        out.push(Section {
            section_title: self.title.unwrap_or_else(|| PREAMBLE_TITLE.to_string()),
            text,
            page_number: self.page,
            document: document.to_string(),
        });
    }
}

/// Split a document's page text into sections.
///
/// `pages` holds the text lines of each page in order. A title line closes
/// the open section and starts a new one on its page; other lines are
/// appended to the open section. Sections without body text are dropped.
/// When no title line produces a section, the whole document becomes one
/// section titled [`FULL_DOCUMENT_TITLE`] on page 1.
pub fn segment_sections<S: AsRef<str>>(document: &str, pages: &[Vec<S>]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut open: Option<OpenSection> = None;
    let mut saw_title = false;

    for (i, lines) in pages.iter().enumerate() {
        let page = i + 1;
        for line in lines {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if is_section_title(trimmed) {
                saw_title = true;
                if let Some(prev) = open.take() {
                    prev.close(document, &mut sections);
                }
                open = Some(OpenSection {
                    title: Some(trimmed.to_string()),
                    page,
                    lines: Vec::new(),
                });
            } else {
                open.get_or_insert_with(|| OpenSection {
                    title: None,
                    page,
                    lines: Vec::new(),
                })
                .lines
                .push(trimmed.to_string());
            }
        }
    }

    if saw_title {
        if let Some(last) = open.take() {
            last.close(document, &mut sections);
        }
    }

    if sections.is_empty() {
        let text = pages
            .iter()
            .flat_map(|lines| lines.iter().map(|l| l.as_ref().trim()))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(Section {
            section_title: FULL_DOCUMENT_TITLE.to_string(),
            text,
            page_number: 1,
            document: document.to_string(),
        });
    }

    tracing::debug!(document, sections = sections.len(), "segmented sections");
    sections
}
