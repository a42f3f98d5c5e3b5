//! The outline pipeline over already-extracted lines.

use crate::features::{FeatureParams, annotate_lines};
use crate::line::TextLine;
use crate::outline::{DocumentOutline, OutlineParams, build_outline};
use crate::scorer::{HeadingParams, select_candidates};

/// All heuristic parameters of the outline pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutlineOptions {
    pub features: FeatureParams,
    pub heading: HeadingParams,
    pub outline: OutlineParams,
}

/// Annotate, score and build the outline of one document.
///
/// Stages run strictly in sequence: font ranks need every line of the
/// document before any line can be scored.
pub fn outline_document(lines: &[TextLine], options: &OutlineOptions) -> DocumentOutline {
    let annotated = annotate_lines(lines, &options.features);
    let candidates = select_candidates(&annotated, &options.heading);
    build_outline(&annotated, &candidates, &options.outline)
}
