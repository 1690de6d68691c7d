//! TF-IDF vectorizer over a small in-memory corpus, plus cosine similarity.
//!
//! - term frequency is the raw token count per document
//! - the vocabulary keeps the `max_features` terms with the highest corpus-wide
//!   count (ties broken by term order)
//! - idf = ln((1 + n) / (1 + df)) + 1
//! - every document vector is L2-normalized, so cosine is a plain dot product
//!
//! Vectors are sparse and sorted by term index; no hash iteration order leaks
//! into any floating point sum.

use std::collections::{BTreeMap, HashMap};

use crate::matching::tokenize::tokenize;

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Sparse, L2-normalized document vector: `(term index, weight)` sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(Vec<(usize, f64)>);

impl SparseVector {
    /// Cosine similarity for two normalized vectors. Empty vectors score 0.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.0.len() && j < other.0.len() {
            let (a_idx, a_w) = self.0[i];
            let (b_idx, b_w) = other.0[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot.clamp(0.0, 1.0)
    }
}

/// A fitted corpus: one vector per input document, in input order.
#[derive(Debug, Clone)]
pub struct TfIdfCorpus {
    vocabulary: BTreeMap<String, usize>,
    vectors: Vec<SparseVector>,
}

impl TfIdfCorpus {
    /// Fits the vectorizer on `documents` and transforms them in one pass.
    pub fn fit(documents: &[&str], max_features: usize) -> Self {
        let token_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in tokenize(doc) {
                    *counts.entry(token).or_insert(0usize) += 1;
                }
                counts
            })
            .collect();

        let mut corpus_counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &token_counts {
            for (term, count) in counts {
                let entry = corpus_counts.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = corpus_counts
            .into_iter()
            .map(|(term, (total, df))| (term, total, df))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);
        // Index terms alphabetically so vectors are ordered the same way the vocabulary is.
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(ranked.len());
        for (index, (term, _, df)) in ranked.iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let vectors = token_counts
            .iter()
            .map(|counts| {
                let mut weights: Vec<(usize, f64)> = counts
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term)
                            .map(|&index| (index, *count as f64 * idf[index]))
                    })
                    .collect();
                weights.sort_by_key(|(index, _)| *index);

                let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut weights {
                        *w /= norm;
                    }
                }
                SparseVector(weights)
            })
            .collect();

        Self { vocabulary, vectors }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }
}

/// Cosine similarity of the first document against each of the rest.
///
/// Returns one score per `others` entry. An empty vocabulary (all documents
/// blank or stop words only) scores every pair 0.
pub fn similarities(query: &str, others: &[&str], max_features: usize) -> Vec<f64> {
    let mut documents = Vec::with_capacity(others.len() + 1);
    documents.push(query);
    documents.extend_from_slice(others);

    let corpus = TfIdfCorpus::fit(&documents, max_features);
    tracing::debug!(
        "TF-IDF fitted: {} terms over {} documents",
        corpus.vocabulary_len(),
        documents.len()
    );
    let empty = SparseVector::default();
    let query_vec = corpus.vector(0).unwrap_or(&empty);

    (1..documents.len())
        .map(|i| corpus.vector(i).map_or(0.0, |v| query_vec.cosine(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_documents_score_one() {
        let scores = similarities(
            "python data pipelines",
            &["python data pipelines", "marketing sales"],
            DEFAULT_MAX_FEATURES,
        );
        assert!(approx(scores[0], 1.0));
        assert!(approx(scores[1], 0.0));
    }

    #[test]
    fn test_partial_overlap_matches_hand_computed_value() {
        // n = 2; "python" appears in both (idf = 1), "sql" and "java" once each
        // (idf = ln(3/2) + 1). resume = [python, sql], job = [python, java].
        let scores = similarities("python sql", &["python java"], DEFAULT_MAX_FEATURES);
        let rare = (1.5f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + rare * rare);
        assert!(approx(scores[0], expected), "got {}", scores[0]);
    }

    #[test]
    fn test_empty_vocabulary_scores_zero() {
        let scores = similarities("", &["the and of", ""], DEFAULT_MAX_FEATURES);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_max_features_limits_vocabulary() {
        let corpus = TfIdfCorpus::fit(&["alpha alpha beta gamma", "alpha beta delta"], 2);
        assert_eq!(corpus.vocabulary_len(), 2);
    }

    #[test]
    fn test_vectors_are_normalized() {
        let corpus = TfIdfCorpus::fit(&["rust tokio axum", "rust serde"], DEFAULT_MAX_FEATURES);
        let v = corpus.vector(0).unwrap();
        assert!(approx(v.cosine(v), 1.0));
    }

    #[test]
    fn test_similarities_are_deterministic() {
        let others = ["kubernetes docker aws", "docker compose", "accounting ledger"];
        let a = similarities("docker aws terraform", &others, DEFAULT_MAX_FEATURES);
        let b = similarities("docker aws terraform", &others, DEFAULT_MAX_FEATURES);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_others_yields_empty() {
        assert!(similarities("python", &[], DEFAULT_MAX_FEATURES).is_empty());
    }
}
