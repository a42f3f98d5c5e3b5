//! Text extraction options.

/// Parameters of run decoding and line assembly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractOptions {
    /// Runs whose baselines differ by at most this many points share a line.
    pub y_tolerance: f64,
    /// A gap wider than this fraction of the font size separates two runs
    /// of one line with a space.
    pub space_gap_ratio: f64,
    /// `TJ` adjustments wider than this (thousandths of an em) become spaces.
    pub word_gap_thousandths: f64,
    /// Lines this close to the top or bottom edge of any page after the
    /// first are treated as running headers/footers. `None` keeps them.
    pub header_footer_margin: Option<f64>,
    /// Maximum nesting of form XObjects.
    pub max_form_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            y_tolerance: 3.0,
            space_gap_ratio: 0.15,
            word_gap_thousandths: 200.0,
            header_footer_margin: Some(40.0),
            max_form_depth: 10,
        }
    }
}
