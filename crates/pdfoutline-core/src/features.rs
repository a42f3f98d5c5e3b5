//! Feature annotation: derive per-line layout signals for heading inference.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::line::{AnnotatedLine, TextLine};

/// Numbering prefixes such as `1 `, `1. `, `1.2. `, `A. ` or `IV. `.
static NUMBERING_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[A-Z]\.|[IVXLCDM]+\.)\s+").expect("valid numbering regex")
});

/// Options for [`annotate_lines`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatureParams {
    /// `y_gap_above` given to the first line of each page.
    pub first_line_gap: f64,
    /// A line counts as all-caps only when longer than this many characters.
    pub all_caps_min_len: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            first_line_gap: 9999.0,
            all_caps_min_len: 3,
        }
    }
}

/// Font size rounded to one decimal place, as an integer count of tenths.
///
/// Integer keys keep equal sizes equal regardless of float noise.
pub fn size_key(font_size: f64) -> i64 {
    (font_size * 10.0).round_ties_even() as i64
}

/// Map each distinct rounded font size to its dense descending rank
/// (1 = largest).
pub fn font_size_ranks(lines: &[TextLine]) -> BTreeMap<i64, usize> {
    let mut keys: Vec<i64> = lines.iter().map(|l| size_key(l.font_size)).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.dedup();
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| (key, i + 1))
        .collect()
}

/// Whether every cased character is uppercase and the text is long enough
/// not to be an acronym or page number.
pub fn is_all_caps(text: &str, min_len: usize) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper && text.chars().count() > min_len
}

/// Whether the text begins with a section-numbering prefix.
pub fn starts_with_numbering(text: &str) -> bool {
    NUMBERING_PREFIX.is_match(text)
}

/// Decorate every line with its derived features.
///
/// The output has the same length and order as the input. Font ranks are
/// computed over the whole document; vertical gaps are computed per page
/// after sorting that page's lines by `top`.
pub fn annotate_lines(lines: &[TextLine], params: &FeatureParams) -> Vec<AnnotatedLine> {
    if lines.is_empty() {
        return Vec::new();
    }

    let ranks = font_size_ranks(lines);

    let mut by_page: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        by_page.entry(line.page).or_default().push(i);
    }

    let mut gaps = vec![params.first_line_gap; lines.len()];
    for indices in by_page.values_mut() {
        indices.sort_by(|&a, &b| lines[a].top.total_cmp(&lines[b].top));
        let mut prev_top: Option<f64> = None;
        for &i in indices.iter() {
            if let Some(prev) = prev_top {
                gaps[i] = lines[i].top - prev;
            }
            prev_top = Some(lines[i].top);
        }
    }

    let annotated: Vec<AnnotatedLine> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| AnnotatedLine {
            index: i,
            font_size_rank: ranks[&size_key(line.font_size)],
            y_gap_above: gaps[i],
            is_all_caps: is_all_caps(&line.text, params.all_caps_min_len),
            starts_with_numbering: starts_with_numbering(&line.text),
            is_bold: line.is_bold(),
            line: line.clone(),
        })
        .collect();

    tracing::debug!(
        lines = annotated.len(),
        distinct_sizes = ranks.len(),
        "annotated lines"
    );
    annotated
}
