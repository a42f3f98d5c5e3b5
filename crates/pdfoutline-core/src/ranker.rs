//! Persona-driven relevance ranking of sections and sentences.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::line::collapse_whitespace;
use crate::sections::Section;
use crate::tfidf::similarities;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

static LIST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*[\u{2022}\-\*\d]+[.)]?\s+|[A-Za-z ]+:)").expect("valid list line regex")
});

/// Phrases marking boilerplate sentences that carry no task-specific content.
pub const GENERIC_PHRASES: &[&str] = &[
    "introduction",
    "this guide",
    "in conclusion",
    "summary",
    "overview",
    "will take you through",
    "provides an in-depth",
    "comprehensive guide",
    "this section",
    "this chapter",
    "let us",
    "we will",
    "the following",
    "aim of this",
    "purpose of this",
    "in this document",
    "in this article",
    "in this paper",
    "in this report",
    "in this book",
    "here are some",
    "known for",
    "is renowned for",
    "is famous for",
    "is home to",
];

/// Options for [`refine_text`] and the collection pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankOptions {
    /// Sentences kept per refined section; list lines get twice as many.
    pub max_sentences: usize,
    /// Sentences with fewer words than this are treated as generic.
    pub min_sentence_words: usize,
    /// Score added per focus keyword present in a sentence.
    pub keyword_weight: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            max_sentences: 5,
            min_sentence_words: 6,
            keyword_weight: 0.2,
        }
    }
}

/// A section with its similarity to the focus string.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedSection {
    pub section: Section,
    pub score: f64,
    /// 1-indexed position in the cross-document ordering; 0 until assigned.
    pub importance_rank: usize,
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().all(char::is_alphanumeric))
}

/// Lowercased, deduplicated alphanumeric words of the persona and task.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    words(text).collect()
}

/// The focus string scored against: the keywords joined by spaces.
pub fn focus_string(keywords: &BTreeSet<String>) -> String {
    keywords.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Score the sections of one document and sort them, most relevant first.
/// Equal scores keep their input order.
pub fn rank_sections(sections: &[Section], keywords: &BTreeSet<String>) -> Vec<RankedSection> {
    let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
    let scores = similarities(&focus_string(keywords), &texts);
    let mut ranked: Vec<RankedSection> = sections
        .iter()
        .zip(scores)
        .map(|(section, score)| RankedSection {
            section: section.clone(),
            score,
            importance_rank: 0,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Pick the best section of each document and rank them across documents.
///
/// `per_document` holds each document's sections in input order; documents
/// without sections contribute nothing. The result is sorted by descending
/// score with `importance_rank` 1..N assigned by position.
pub fn select_top_sections(
    per_document: &[Vec<Section>],
    keywords: &BTreeSet<String>,
) -> Vec<RankedSection> {
    let mut top: Vec<RankedSection> = per_document
        .iter()
        .filter(|sections| !sections.is_empty())
        .filter_map(|sections| rank_sections(sections, keywords).into_iter().next())
        .collect();
    top.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, ranked) in top.iter_mut().enumerate() {
        ranked.importance_rank = i + 1;
    }
    top
}

/// Lines that look like list items: bullets, numbering, `Label:` headers,
/// or at least two semicolons. Deduplicated, first occurrence kept.
pub fn list_lines(text: &str) -> Vec<String> {
    let pattern = text.lines().filter(|l| LIST_LINE.is_match(l));
    let semicolons = text.lines().filter(|l| l.matches(';').count() >= 2);
    let mut seen = HashSet::new();
    pattern
        .chain(semicolons)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(*l))
        .map(str::to_string)
        .collect()
}

/// Split text into sentences after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(j, next)) = chars.peek() {
            if next.is_whitespace() {
                sentences.push(&text[start..j]);
                start = j;
            }
        }
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether a sentence is boilerplate or too short to be informative.
pub fn is_generic_sentence(sentence: &str, min_words: usize) -> bool {
    let lower = sentence.to_lowercase();
    GENERIC_PHRASES.iter().any(|p| lower.contains(p)) || lower.split_whitespace().count() < min_words
}

fn keyword_overlap(sentence: &str, keywords: &BTreeSet<String>) -> usize {
    let present: HashSet<String> = words(sentence).collect();
    keywords.iter().filter(|k| present.contains(*k)).count()
}

/// Extract the text of a section most relevant to the focus keywords.
///
/// List-like lines win outright (up to twice `max_sentences` of them).
/// Otherwise non-generic sentences are scored by TF-IDF similarity plus a
/// per-keyword bonus and the best `max_sentences` are joined in their
/// original order.
pub fn refine_text(text: &str, keywords: &BTreeSet<String>, options: &RankOptions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lists = list_lines(text);
    if !lists.is_empty() {
        let take = options.max_sentences * 2;
        return lists.into_iter().take(take).collect::<Vec<_>>().join(" ");
    }

    let sentences = split_sentences(text);
    let filtered: Vec<String> = sentences
        .iter()
        .filter(|s| !is_generic_sentence(s, options.min_sentence_words))
        .cloned()
        .collect();
    let pool = if filtered.len() < options.max_sentences {
        sentences
    } else {
        filtered
    };

    let sims = similarities(&focus_string(keywords), &pool);
    let mut scored: Vec<(f64, usize)> = pool
        .iter()
        .zip(sims)
        .enumerate()
        .map(|(i, (s, sim))| {
            let bonus = options.keyword_weight * keyword_overlap(s, keywords) as f64;
            (sim + bonus, i)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let mut chosen: Vec<usize> = scored
        .into_iter()
        .take(options.max_sentences)
        .map(|(_, i)| i)
        .collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|i| pool[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(doc: &str, title: &str, text: &str) -> Section {
        Section {
            section_title: title.to_string(),
            text: text.to_string(),
            page_number: 1,
            document: doc.to_string(),
        }
    }

    fn keywords(s: &str) -> BTreeSet<String> {
        extract_keywords(s)
    }

    #[test]
    fn keywords_are_lowercase_and_unique() {
        let k = keywords("Investor evaluate quarterly RISK, risk_free risk");
        let got: Vec<&str> = k.iter().map(String::as_str).collect();
        assert_eq!(got, vec!["evaluate", "investor", "quarterly", "risk"]);
    }

    #[test]
    fn focus_string_is_sorted() {
        assert_eq!(focus_string(&keywords("b a c a")), "a b c");
    }

    #[test]
    fn sections_sorted_by_similarity() {
        let sections = vec![
            section("d", "Cooking", "lemon cake recipe with sugar"),
            section("d", "Risk", "quarterly risk evaluation of currency risk"),
        ];
        let ranked = rank_sections(&sections, &keywords("Investor evaluate quarterly risk"));
        assert_eq!(ranked[0].section.section_title, "Risk");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn importance_rank_follows_score_not_input_order() {
        let docs = vec![
            vec![section("low.pdf", "A", "nothing relevant here at all")],
            vec![section("high.pdf", "B", "quarterly risk")],
        ];
        let top = select_top_sections(&docs, &keywords("quarterly risk"));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].section.document, "high.pdf");
        assert_eq!(top[0].importance_rank, 1);
        assert_eq!(top[1].section.document, "low.pdf");
        assert_eq!(top[1].importance_rank, 2);
    }

    #[test]
    fn one_top_section_per_document_and_empty_documents_skipped() {
        let docs = vec![
            vec![
                section("a.pdf", "A1", "risk"),
                section("a.pdf", "A2", "risk risk quarterly"),
            ],
            vec![],
            vec![section("c.pdf", "C1", "quarterly")],
        ];
        let top = select_top_sections(&docs, &keywords("quarterly risk"));
        let documents: Vec<&str> = top.iter().map(|r| r.section.document.as_str()).collect();
        assert_eq!(top.len(), 2);
        assert!(documents.contains(&"a.pdf"));
        assert!(documents.contains(&"c.pdf"));
    }

    #[test]
    fn semicolon_line_is_kept_verbatim() {
        let text = "Our outlook remains stable this year.\n\
                    Risk Factors: currency exposure; interest rate exposure; regulatory exposure;\n\
                    Management reviews the numbers monthly.";
        let refined = refine_text(text, &keywords("Investor evaluate quarterly risk"), &RankOptions::default());
        assert!(refined.contains(
            "Risk Factors: currency exposure; interest rate exposure; regulatory exposure;"
        ));
    }

    #[test]
    fn list_lines_are_deduplicated_and_bounded() {
        let mut text = String::new();
        for i in 0..15 {
            text.push_str(&format!("- item {i}\n"));
        }
        text.push_str("- item 0\n");
        let lines = list_lines(&text);
        assert_eq!(lines.len(), 15);
        let refined = refine_text(&text, &keywords("item"), &RankOptions::default());
        assert_eq!(refined.matches("- item").count(), 10);
    }

    #[test]
    fn list_line_patterns() {
        let text = "\u{2022} bullet point\n* star item\n3) numbered\nIngredients: flour\nplain prose line\na; b; c";
        let lines = list_lines(text);
        assert_eq!(
            lines,
            vec!["\u{2022} bullet point", "* star item", "3) numbered", "Ingredients: flour", "a; b; c"]
        );
    }

    #[test]
    fn sentence_splitting() {
        let s = split_sentences("First one. Second!  Third?\nFourth 3.5 stays. End");
        assert_eq!(s, vec!["First one.", "Second!", "Third?", "Fourth 3.5 stays.", "End"]);
    }

    #[test]
    fn generic_sentences() {
        assert!(is_generic_sentence("This guide will take you through the basics of it all", 6));
        assert!(is_generic_sentence("Too short to count.", 6));
        assert!(!is_generic_sentence("Currency exposure rose sharply during the third quarter.", 6));
    }

    #[test]
    fn empty_text_refines_to_empty() {
        assert_eq!(refine_text("   \n ", &keywords("x"), &RankOptions::default()), "");
    }

    #[test]
    fn best_sentences_in_original_order() {
        let text = "Currency risk rose sharply in the third quarter this year. \
                    The cafeteria menu changed to include more vegetarian dishes. \
                    Interest rate risk remains the largest quarterly exposure for us. \
                    Staff parking will be repainted over the long weekend soon.";
        let opts = RankOptions {
            max_sentences: 2,
            ..RankOptions::default()
        };
        let refined = refine_text(text, &keywords("quarterly risk"), &opts);
        assert_eq!(
            refined,
            "Currency risk rose sharply in the third quarter this year. \
             Interest rate risk remains the largest quarterly exposure for us."
        );
    }

    #[test]
    fn filtering_reverts_when_too_few_remain() {
        let text = "Short one. Another short. Risk noted.";
        let refined = refine_text(text, &keywords("risk"), &RankOptions::default());
        assert_eq!(refined, "Short one. Another short. Risk noted.");
    }
}
