//! Full pipeline run: resume upload → skills → job search → ranking → cards
//! and insights, in one request.
//!
//! Extraction and job source failures do not fail the request. They become
//! `notices` on a report with zero matches.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analytics::insights::{compute_insights, Insights};
use crate::errors::AppError;
use crate::jobs::models::{DatePosted, SearchRequest};
use crate::matching::cards::{build_cards, MatchCard, SortBy, ViewOptions};
use crate::matching::rank_blocking;
use crate::resume::handlers::ResumeUpload;
use crate::resume::{ResumeDocument, ResumeView};
use crate::state::AppState;

/// A recoverable failure reported alongside the (possibly empty) results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub query: String,
    pub resume: Option<ResumeView>,
    pub total_jobs: usize,
    pub matches: Vec<MatchCard>,
    pub insights: Insights,
    pub notices: Vec<Notice>,
}

/// Search and view parameters carried as multipart text fields.
#[derive(Debug)]
struct PipelineParams {
    search: SearchRequest,
    options: ViewOptions,
}

impl PipelineParams {
    fn from_upload(upload: &ResumeUpload) -> Result<Self, AppError> {
        let query = upload
            .field("query")
            .ok_or_else(|| AppError::Validation("query cannot be empty".to_string()))?;

        let mut search = SearchRequest::new(query, upload.field("location").unwrap_or_default());
        if let Some(pages) = upload.field("num_pages") {
            search.num_pages = parse_field("num_pages", pages)?;
        }
        if let Some(date_posted) = upload.field("date_posted") {
            search.date_posted =
                serde_json::from_value::<DatePosted>(serde_json::Value::String(date_posted.to_string()))
                    .map_err(|_| {
                        AppError::Validation(format!("unknown date_posted '{date_posted}'"))
                    })?;
        }
        if let Some(types) = upload.field("employment_types") {
            search.employment_types = types.split(',').map(str::to_string).collect();
        }
        search.remote_only = upload.field("remote_only").map_or(false, parse_flag);

        let mut options = ViewOptions::default();
        if let Some(top_n) = upload.field("top_n") {
            options.top_n = parse_field("top_n", top_n)?;
        }
        if let Some(min_score) = upload.field("min_score_percent") {
            options.min_score_percent = parse_field("min_score_percent", min_score)?;
        }
        if let Some(sort_by) = upload.field("sort_by") {
            options.sort_by = match sort_by {
                "best_match" => SortBy::BestMatch,
                "company" => SortBy::Company,
                other => {
                    return Err(AppError::Validation(format!("unknown sort_by '{other}'")));
                }
            };
        }
        options.validate()?;

        Ok(Self {
            search: search.normalized(),
            options,
        })
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid value '{raw}' for {name}")))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

/// POST /api/v1/pipeline
///
/// Multipart: `resume` file plus `query`, `location` and optional
/// `num_pages`, `date_posted`, `employment_types`, `remote_only`, `top_n`,
/// `min_score_percent`, `sort_by` fields.
pub async fn handle_pipeline(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PipelineReport>, AppError> {
    let upload = ResumeUpload::read(multipart).await?;
    let params = PipelineParams::from_upload(&upload)?;
    let run_id = Uuid::new_v4();
    info!("Pipeline run {run_id}: '{}'", params.search.search_query());

    let mut notices = Vec::new();

    let resume = match upload.into_document(&state).await {
        Ok(resume) => Some(resume),
        Err(err @ (AppError::Validation(_) | AppError::Internal(_))) => return Err(err),
        Err(err) => {
            warn!("Pipeline run {run_id}: resume unavailable: {err}");
            notices.push(Notice::from(&err));
            None
        }
    };

    let jobs = match &resume {
        Some(_) => match state.job_source.search(&params.search).await {
            Ok(jobs) => jobs,
            Err(source_err) => {
                let err = AppError::from(source_err);
                if matches!(err, AppError::Validation(_)) {
                    return Err(err);
                }
                warn!("Pipeline run {run_id}: job search failed: {err}");
                notices.push(Notice::from(&err));
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let total_jobs = jobs.len();

    let (resume, results) = match resume {
        Some(resume) => {
            let (resume, results) = rank_blocking(state.scorer.clone(), resume, jobs).await?;
            (Some(resume), results)
        }
        None => (None, Vec::new()),
    };

    let empty = ResumeDocument {
        raw_text: String::new(),
        extracted_skills: Default::default(),
    };
    let held = resume.as_ref().unwrap_or(&empty);
    let matches = build_cards(&results, held, &params.options);
    let insights = compute_insights(&results, &held.extracted_skills);

    info!(
        "Pipeline run {run_id}: {} jobs ranked, {} shown, {} notices",
        results.len(),
        matches.len(),
        notices.len()
    );

    Ok(Json(PipelineReport {
        run_id,
        query: params.search.search_query(),
        resume: resume.map(|r| ResumeView::build(r, &state.skills)),
        total_jobs,
        matches,
        insights,
        notices,
    }))
}
