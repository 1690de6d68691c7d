//! Scores every job in a batch against one resume and ranks them.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; `TfIdfJaccardScorer` is the
//! only backend.

use serde::{Deserialize, Serialize};

use crate::jobs::models::JobPosting;
use crate::matching::scoring::{jaccard, MatchWeights};
use crate::matching::tfidf::{self, DEFAULT_MAX_FEATURES};
use crate::resume::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub content_similarity: f64,
    pub skill_overlap: f64,
}

/// One scored job. `score` is always within [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: JobPosting,
    pub score: f64,
    pub sub_scores: SubScores,
}

/// Ranking capability: resume plus job batch in, results sorted by score
/// descending out. Ties keep the batch order.
pub trait MatchScorer: Send + Sync {
    fn rank(&self, resume: &ResumeDocument, jobs: &[JobPosting]) -> Vec<MatchResult>;
}

/// TF-IDF cosine over `{resume} ∪ {job descriptions}` combined with Jaccard
/// overlap of skill sets.
///
/// The TF-IDF vocabulary is fitted on each batch, so the same job can score
/// differently when ranked alongside different jobs.
#[derive(Debug, Clone, Copy)]
pub struct TfIdfJaccardScorer {
    pub weights: MatchWeights,
    pub max_features: usize,
}

impl Default for TfIdfJaccardScorer {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl MatchScorer for TfIdfJaccardScorer {
    fn rank(&self, resume: &ResumeDocument, jobs: &[JobPosting]) -> Vec<MatchResult> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let descriptions: Vec<&str> = jobs.iter().map(|job| job.description.as_str()).collect();
        let content = tfidf::similarities(&resume.raw_text, &descriptions, self.max_features);

        let mut results: Vec<MatchResult> = jobs
            .iter()
            .zip(content)
            .map(|(job, content_similarity)| {
                let skill_overlap = jaccard(&resume.extracted_skills, &job.skills_required);
                MatchResult {
                    job: job.clone(),
                    score: self.weights.composite(content_similarity, skill_overlap),
                    sub_scores: SubScores {
                        content_similarity,
                        skill_overlap,
                    },
                }
            })
            .collect();

        // `sort_by` is stable, so equal scores keep fetch order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }
}
