use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// False when no search key is configured; searches then report the
    /// source as unavailable.
    pub job_source_configured: bool,
    pub skill_vocabulary_size: usize,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "jobmatch-api",
        version: env!("CARGO_PKG_VERSION"),
        job_source_configured: state.config.rapidapi_key.is_some(),
        skill_vocabulary_size: state.skills.vocabulary().len(),
    })
}
