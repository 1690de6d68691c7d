//! Axum route handlers for the Matching API.

use std::collections::BTreeSet;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::models::JobPosting;
use crate::matching::cards::{build_cards, MatchCard, ViewOptions};
use crate::matching::matcher::MatchResult;
use crate::matching::rank_blocking;
use crate::resume::extractor::clean_text;
use crate::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Shared body of the matches, export, and analytics endpoints. The API is
/// stateless, so callers send the resume text and job batch every time.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub options: ViewOptions,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub resume_skills: BTreeSet<String>,
    pub total_ranked: usize,
    pub cards: Vec<MatchCard>,
}

/// Builds the resume from `resume_text` and ranks the supplied jobs. Jobs with
/// a blank title or description are dropped before ranking.
pub async fn rank_request(
    state: &AppState,
    request: &MatchRequest,
) -> Result<(ResumeDocument, Vec<MatchResult>), AppError> {
    request.options.validate()?;
    let resume = ResumeDocument::new(clean_text(&request.resume_text), state.skills.as_ref());
    rank_blocking(state.scorer.clone(), resume, rankable_jobs(&request.jobs)).await
}

fn rankable_jobs(jobs: &[JobPosting]) -> Vec<JobPosting> {
    let kept: Vec<JobPosting> = jobs
        .iter()
        .filter(|job| !job.title.trim().is_empty() && !job.description.trim().is_empty())
        .cloned()
        .collect();
    if kept.len() < jobs.len() {
        tracing::warn!(
            "Dropped {} of {} submitted jobs: missing title or description",
            jobs.len() - kept.len(),
            jobs.len()
        );
    }
    kept
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches
///
/// Ranks the jobs against the resume text and returns match cards after the
/// view options (score floor, sort, top N) are applied.
pub async fn handle_matches(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchesResponse>, AppError> {
    let (resume, results) = rank_request(&state, &request).await?;
    let cards = build_cards(&results, &resume, &request.options);

    Ok(Json(MatchesResponse {
        total_ranked: results.len(),
        resume_skills: resume.extracted_skills,
        cards,
    }))
}
