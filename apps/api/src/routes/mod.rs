pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::pipeline;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resume/upload", post(resume::handle_upload))
        .route("/api/v1/resume/text", post(resume::handle_text))
        // Jobs API
        .route("/api/v1/jobs/search", post(jobs::handle_search))
        // Matching + analytics API
        .route("/api/v1/matches", post(matching::handle_matches))
        .route("/api/v1/matches/export", post(analytics::handle_export))
        .route("/api/v1/analytics", post(analytics::handle_analytics))
        // One-shot pipeline
        .route("/api/v1/pipeline", post(pipeline::handle_pipeline))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
