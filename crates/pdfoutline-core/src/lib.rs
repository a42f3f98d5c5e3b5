//! pdfoutline-core: backend-independent heading inference and relevance ranking.
//!
//! This crate turns annotated text lines into a document outline (title plus
//! H1–H3 headings), splits plain page text into titled sections, and ranks
//! sections and sentences against a persona/task focus string. It knows
//! nothing about PDF parsing; `pdfoutline-parse` produces the [`TextLine`]s.

pub mod features;
pub mod line;
pub mod outline;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod sections;
pub mod tfidf;

pub use features::{FeatureParams, annotate_lines, font_size_ranks, is_all_caps, starts_with_numbering};
pub use line::{AnnotatedLine, HeadingCandidate, SpanFlags, StyleKey, TextLine, collapse_whitespace};
pub use outline::{
    DocumentOutline, HeadingLevel, LeveledHeading, OutlineEntry, OutlineParams, build_outline,
    merge_wrapped_headings,
};
pub use pipeline::{OutlineOptions, outline_document};
pub use ranker::{
    RankOptions, RankedSection, extract_keywords, rank_sections, refine_text, select_top_sections,
};
pub use scorer::{HeadingParams, score_line, select_candidates};
pub use sections::{FULL_DOCUMENT_TITLE, Section, is_section_title, segment_sections};
