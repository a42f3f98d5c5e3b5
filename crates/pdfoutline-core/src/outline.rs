//! Outline building: title selection, style clustering into H1–H3,
//! wrapped-heading merge and first-entry promotion.

use std::collections::HashMap;
use std::fmt;

use crate::features::size_key;
use crate::line::{AnnotatedLine, HeadingCandidate, StyleKey};

/// Options for [`build_outline`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutlineParams {
    /// Width of one indentation bucket in points.
    pub indent_bucket_width: f64,
    /// Adjacent same-page, same-level entries whose sizes differ by at most
    /// this many points are merged into one heading.
    pub merge_size_tolerance: f64,
    /// Title used when page 1 has no text at all.
    pub fallback_title: String,
    /// Page-1 candidates containing any of these phrases (case-insensitive)
    /// are never chosen as the title.
    pub title_exclusions: Vec<String>,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            indent_bucket_width: 20.0,
            merge_size_tolerance: 1.0,
            fallback_title: "Untitled Document".to_string(),
            title_exclusions: vec!["table of contents".to_string()],
        }
    }
}

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heading of the document outline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    /// Page number (1-indexed).
    pub page: usize,
}

/// Title plus hierarchical headings of one document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

/// A level-tagged heading that still carries its font size for merging.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledHeading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
    pub font_size: f64,
}

impl From<LeveledHeading> for OutlineEntry {
    fn from(h: LeveledHeading) -> Self {
        OutlineEntry {
            level: h.level,
            text: h.text,
            page: h.page,
        }
    }
}

/// The chosen title and the line indices it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub line_indices: Vec<usize>,
}

/// Indentation bucket of a left coordinate.
pub fn indent_bucket(left: f64, width: f64) -> i64 {
    (left / width).round_ties_even() as i64
}

/// Style key of a candidate.
pub fn style_key(line: &AnnotatedLine, params: &OutlineParams) -> StyleKey {
    StyleKey {
        font_size_rank: line.font_size_rank,
        is_bold: line.is_bold,
        indent_bucket: indent_bucket(line.line.left, params.indent_bucket_width),
    }
}

/// Pick the document title.
///
/// The highest-scoring page-1 candidate wins, earliest first among ties.
/// Without one, the first contiguous block of largest-font lines on page 1
/// (in visual order) is joined into the title; without any page-1 text the
/// fallback title is used.
pub fn select_title(
    lines: &[AnnotatedLine],
    candidates: &[HeadingCandidate],
    params: &OutlineParams,
) -> Title {
    let mut best: Option<&HeadingCandidate> = None;
    for c in candidates.iter().filter(|c| c.line.page() == 1) {
        let lower = c.line.text().to_lowercase();
        if params
            .title_exclusions
            .iter()
            .any(|phrase| lower.contains(&phrase.to_lowercase()))
        {
            continue;
        }
        if best.is_none_or(|b| c.heading_score > b.heading_score) {
            best = Some(c);
        }
    }
    if let Some(c) = best {
        return Title {
            text: c.line.text().to_string(),
            line_indices: vec![c.line.index],
        };
    }

    let mut page_one: Vec<&AnnotatedLine> = lines.iter().filter(|l| l.page() == 1).collect();
    page_one.sort_by(|a, b| a.line.top.total_cmp(&b.line.top));
    let Some(max_key) = page_one.iter().map(|l| size_key(l.line.font_size)).max() else {
        return Title {
            text: params.fallback_title.clone(),
            line_indices: Vec::new(),
        };
    };

    let mut block: Vec<&AnnotatedLine> = Vec::new();
    for line in page_one {
        if size_key(line.line.font_size) == max_key {
            block.push(line);
        } else if !block.is_empty() {
            break;
        }
    }
    Title {
        text: block
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" "),
        line_indices: block.iter().map(|l| l.index).collect(),
    }
}

/// Map the three leading style groups to H1, H2 and H3.
///
/// Groups are ordered by font rank, then indentation, then first
/// appearance. Candidates outside the three groups get no level.
pub fn assign_levels(
    candidates: &[HeadingCandidate],
    params: &OutlineParams,
) -> HashMap<StyleKey, HeadingLevel> {
    let mut first_seen: Vec<StyleKey> = Vec::new();
    for c in candidates {
        let key = style_key(&c.line, params);
        if !first_seen.contains(&key) {
            first_seen.push(key);
        }
    }
    // Stable sort: equal (rank, indent) keys stay in first-appearance order.
    first_seen.sort_by_key(|k| (k.font_size_rank, k.indent_bucket));
    first_seen
        .into_iter()
        .zip(HeadingLevel::ALL)
        .collect()
}

/// Merge headings that wrapped onto several lines.
///
/// An entry joins the previous kept entry when both share page and level
/// and either their sizes are within `tolerance` or their texts are
/// identical. Identical texts collapse to one copy.
pub fn merge_wrapped_headings(entries: Vec<LeveledHeading>, tolerance: f64) -> Vec<LeveledHeading> {
    let mut merged: Vec<LeveledHeading> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(last) = merged.last_mut() {
            let same_place = last.page == entry.page && last.level == entry.level;
            let same_text = last.text == entry.text;
            let close_size = (last.font_size - entry.font_size).abs() <= tolerance;
            if same_place && (close_size || same_text) {
                if !same_text {
                    last.text.push(' ');
                    last.text.push_str(&entry.text);
                }
                continue;
            }
        }
        merged.push(entry);
    }
    merged
}

/// Build the outline of one document from its annotated lines and the
/// heading candidates selected among them.
pub fn build_outline(
    lines: &[AnnotatedLine],
    candidates: &[HeadingCandidate],
    params: &OutlineParams,
) -> DocumentOutline {
    let title = select_title(lines, candidates, params);

    let body: Vec<HeadingCandidate> = candidates
        .iter()
        .filter(|c| !title.line_indices.contains(&c.line.index))
        .cloned()
        .collect();

    let levels = assign_levels(&body, params);

    let mut leveled: Vec<(usize, LeveledHeading)> = body
        .iter()
        .filter_map(|c| {
            let level = *levels.get(&style_key(&c.line, params))?;
            Some((
                c.line.index,
                LeveledHeading {
                    level,
                    text: c.line.text().to_string(),
                    page: c.line.page(),
                    font_size: c.line.line.font_size,
                },
            ))
        })
        .collect();
    leveled.sort_by_key(|(index, h)| (h.page, *index));

    let mut merged = merge_wrapped_headings(
        leveled.into_iter().map(|(_, h)| h).collect(),
        params.merge_size_tolerance,
    );
    if let Some(first) = merged.first_mut() {
        first.level = HeadingLevel::H1;
    }

    tracing::debug!(
        title = %title.text,
        style_groups = levels.len(),
        headings = merged.len(),
        "built outline"
    );

    DocumentOutline {
        title: title.text,
        outline: merged.into_iter().map(OutlineEntry::from).collect(),
    }
}
