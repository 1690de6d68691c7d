//! Axum route handlers for the Analytics API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::analytics::export::{cards_to_csv, export_file_name};
use crate::analytics::insights::{compute_insights, Insights};
use crate::errors::AppError;
use crate::matching::cards::build_cards;
use crate::matching::handlers::{rank_request, MatchRequest};
use crate::state::AppState;

/// POST /api/v1/matches/export
///
/// Same body as `/api/v1/matches`; responds with the cards as a CSV download.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Response, AppError> {
    let (resume, results) = rank_request(&state, &request).await?;
    let cards = build_cards(&results, &resume, &request.options);
    let csv = cards_to_csv(&cards)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(chrono::Utc::now())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/v1/analytics
///
/// Insights over every ranked job (view options only gate validation here).
pub async fn handle_analytics(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<Insights>, AppError> {
    let (resume, results) = rank_request(&state, &request).await?;
    Ok(Json(compute_insights(&results, &resume.extracted_skills)))
}
