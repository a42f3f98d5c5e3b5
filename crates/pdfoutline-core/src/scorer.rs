//! Heading scoring: an additive, integer heuristic over annotated features.

use std::collections::BTreeMap;

use crate::features::size_key;
use crate::line::{AnnotatedLine, HeadingCandidate};

/// Weights and thresholds for [`score_line`] and [`select_candidates`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeadingParams {
    /// Points per rank step below `rank_ceiling`.
    pub rank_weight: i32,
    /// Ranks at or above this value earn no font-size points.
    pub rank_ceiling: usize,
    pub bold_bonus: i32,
    pub all_caps_bonus: i32,
    pub numbering_bonus: i32,
    /// Gaps strictly larger than this earn `isolation_bonus`.
    pub isolation_gap: f64,
    pub isolation_bonus: i32,
    /// Lines longer than this many characters lose `long_line_penalty`.
    pub long_line_chars: usize,
    pub long_line_penalty: i32,
    /// Minimum score for a line to become a candidate.
    pub min_score: i32,
    /// Upper bound on the number of candidates kept.
    pub max_candidates: usize,
    /// Drop non-bold lines set in the dominant body size before the
    /// `min_score` threshold is applied.
    pub exclude_body_text: bool,
}

impl Default for HeadingParams {
    fn default() -> Self {
        Self {
            rank_weight: 2,
            rank_ceiling: 10,
            bold_bonus: 3,
            all_caps_bonus: 2,
            numbering_bonus: 2,
            isolation_gap: 8.0,
            isolation_bonus: 1,
            long_line_chars: 140,
            long_line_penalty: 4,
            min_score: 5,
            max_candidates: 40,
            exclude_body_text: true,
        }
    }
}

/// Heuristic heading score of a single line.
pub fn score_line(line: &AnnotatedLine, params: &HeadingParams) -> i32 {
    let mut score = 0;
    let steps = params.rank_ceiling.saturating_sub(line.font_size_rank);
    score += params.rank_weight * steps as i32;
    if line.is_bold {
        score += params.bold_bonus;
    }
    if line.is_all_caps {
        score += params.all_caps_bonus;
    }
    if line.starts_with_numbering {
        score += params.numbering_bonus;
    }
    if line.y_gap_above > params.isolation_gap {
        score += params.isolation_bonus;
    }
    if line.text().chars().count() > params.long_line_chars {
        score -= params.long_line_penalty;
    }
    score
}

/// The rounded font size carried by the most lines, ties going to the
/// smaller size.
///
/// Returns `None` when the document uses a single size, since body text
/// cannot then be told apart from headings by size.
pub fn body_size_key(lines: &[AnnotatedLine]) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for line in lines {
        *counts.entry(size_key(line.line.font_size)).or_default() += 1;
    }
    if counts.len() < 2 {
        return None;
    }
    let mut best: Option<(i64, usize)> = None;
    for (&key, &count) in &counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key)
}

/// Score every line and keep the heading candidates.
///
/// With `exclude_body_text` set (the default), non-bold lines in the
/// document's dominant body size are removed first, whatever they would
/// score. Of the rest, candidates score at least `min_score`; when more than
/// `max_candidates` qualify, the highest-scoring ones are kept (earlier lines
/// win ties). The result is in the original line order.
pub fn select_candidates(lines: &[AnnotatedLine], params: &HeadingParams) -> Vec<HeadingCandidate> {
    let body = if params.exclude_body_text {
        body_size_key(lines)
    } else {
        None
    };

    let mut candidates: Vec<HeadingCandidate> = lines
        .iter()
        .filter(|l| !(body == Some(size_key(l.line.font_size)) && !l.is_bold))
        .map(|l| HeadingCandidate {
            heading_score: score_line(l, params),
            line: l.clone(),
        })
        .filter(|c| c.heading_score >= params.min_score)
        .collect();

    if candidates.len() > params.max_candidates {
        // Stable sort keeps earlier lines ahead among equal scores.
        candidates.sort_by(|a, b| b.heading_score.cmp(&a.heading_score));
        candidates.truncate(params.max_candidates);
        candidates.sort_by_key(|c| c.line.index);
    }

    tracing::debug!(
        candidates = candidates.len(),
        body_size = ?body.map(|k| k as f64 / 10.0),
        "selected heading candidates"
    );
    candidates
}
