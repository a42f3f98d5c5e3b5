//! TF-IDF vector space and cosine similarity.
//!
//! Tokens are lowercased runs of two or more word characters. Inverse
//! document frequency is smoothed, `ln((1 + n) / (1 + df)) + 1`, term
//! frequencies are raw counts and every vector is L2-normalised, so cosine
//! similarity reduces to a dot product.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Lowercased tokens of a text, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// A sparse, L2-normalised term vector sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product; equals cosine similarity for normalised vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, x) = self.entries[i];
            let (b, y) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += x * y;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Vocabulary and idf weights fitted on a corpus.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Fit the vocabulary and idf weights on `corpus`.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in corpus {
            let mut terms = tokenize(doc.as_ref());
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *df.entry(term).or_default() += 1;
            }
        }

        let n = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(df.len());
        for (i, (term, count)) in df.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
            vocabulary.insert(term, i);
        }
        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project a text into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        SparseVector { entries }
    }
}

/// Cosine similarity of `query` to each candidate, with the space fitted
/// on the query together with all candidates.
pub fn similarities<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<f64> {
    let mut corpus: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
    corpus.push(query);
    corpus.extend(candidates.iter().map(|c| c.as_ref()));
    let model = TfidfModel::fit(&corpus);
    let query_vec = model.transform(query);
    candidates
        .iter()
        .map(|c| query_vec.dot(&model.transform(c.as_ref())))
        .collect()
}
