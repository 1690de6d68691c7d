//! Matcher: TF-IDF content similarity plus skill overlap, ranked and shaped
//! into match cards.

pub mod cards;
pub mod handlers;
pub mod matcher;
pub mod scoring;
pub mod tfidf;
pub mod tokenize;

use std::sync::Arc;

use anyhow::anyhow;

use crate::errors::AppError;
use crate::jobs::models::JobPosting;
use crate::matching::matcher::{MatchResult, MatchScorer};
use crate::resume::ResumeDocument;

/// Runs `scorer.rank` on a blocking thread; scoring is CPU-bound.
pub async fn rank_blocking(
    scorer: Arc<dyn MatchScorer>,
    resume: ResumeDocument,
    jobs: Vec<JobPosting>,
) -> Result<(ResumeDocument, Vec<MatchResult>), AppError> {
    tokio::task::spawn_blocking(move || {
        let results = scorer.rank(&resume, &jobs);
        (resume, results)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("ranking task failed: {e}")))
}
