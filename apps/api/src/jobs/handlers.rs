//! Axum route handlers for the Jobs API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::models::{JobPosting, SearchRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub jobs: Vec<JobPosting>,
}

/// POST /api/v1/jobs/search
///
/// Runs one search against the configured job source and returns the
/// normalized postings. Source failures surface as 503.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let request = request.normalized();
    if request.query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let jobs = state.job_source.search(&request).await?;

    Ok(Json(SearchResponse {
        query: request.search_query(),
        total: jobs.len(),
        jobs,
    }))
}
