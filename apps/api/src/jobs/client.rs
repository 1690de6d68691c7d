//! Job search client: queries the JSearch API (RapidAPI) and normalizes the
//! response into `JobPosting`s.
//!
//! The client never reads the environment: the key, host, base URL and timeout
//! all arrive through `JobSourceConfig`. No request is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use crate::jobs::models::{JobPosting, SearchRequest};
use crate::jobs::normalize::{normalize_batch, JobsPayload};
use crate::skills::SkillExtractor;

#[derive(Debug, Error)]
pub enum JobSourceError {
    #[error("search query cannot be empty")]
    EmptyQuery,

    #[error("job search API key is not configured")]
    MissingApiKey,

    #[error("job search timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not reach job search service: {0}")]
    Transport(String),

    #[error("job search API key is invalid or lacks permission (status {0})")]
    Unauthorized(u16),

    #[error("job search rate limit exceeded, try again later")]
    RateLimited,

    #[error("job search failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode job search response: {0}")]
    Decode(String),
}

/// Explicit settings for `JSearchClient`.
#[derive(Debug, Clone)]
pub struct JobSourceConfig {
    pub base_url: String,
    pub host: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Anything that can turn a search request into job postings.
///
/// Carried in `AppState` as `Arc<dyn JobSource>`.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, JobSourceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// JSearchClient
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct JSearchClient {
    client: Client,
    config: JobSourceConfig,
    skills: Arc<dyn SkillExtractor>,
}

impl JSearchClient {
    pub fn new(
        config: JobSourceConfig,
        skills: Arc<dyn SkillExtractor>,
    ) -> Result<Self, JobSourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| JobSourceError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            config,
            skills,
        })
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", request.search_query()),
            ("page", "1".to_string()),
            ("num_pages", request.num_pages.to_string()),
            ("date_posted", request.date_posted.as_str().to_string()),
        ];
        if !request.employment_types.is_empty() {
            params.push(("employment_types", request.employment_types.join(",")));
        }
        if request.remote_only {
            params.push(("remote_jobs_only", "true".to_string()));
        }
        params
    }

    fn map_transport_error(&self, err: reqwest::Error) -> JobSourceError {
        if err.is_timeout() {
            JobSourceError::Timeout(self.config.timeout)
        } else {
            JobSourceError::Transport(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl JobSource for JSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, JobSourceError> {
        let request = request.normalized();
        if request.query.is_empty() {
            return Err(JobSourceError::EmptyQuery);
        }

        let Some(api_key) = self.api_key() else {
            error!("No API key configured for job search");
            return Err(JobSourceError::MissingApiKey);
        };

        let search_query = request.search_query();
        info!("Searching jobs: {search_query} (pages: {})", request.num_pages);

        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.config.host)
            .query(&Self::query_params(&request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Job search rejected the API key ({status})");
                return Err(JobSourceError::Unauthorized(status.as_u16()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                error!("Job search rate limit exceeded");
                return Err(JobSourceError::RateLimited);
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                let body: String = body.chars().take(200).collect();
                error!("Job search API error {status}: {body}");
                return Err(JobSourceError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let payload: JobsPayload =
            serde_json::from_slice(&bytes).map_err(|e| JobSourceError::Decode(e.to_string()))?;

        let records = payload.into_records();
        let received = records.len();
        let skills = Arc::clone(&self.skills);
        let postings = tokio::task::spawn_blocking(move || normalize_batch(records, skills.as_ref()))
            .await
            .map_err(|e| JobSourceError::Decode(format!("normalization aborted: {e}")))?;

        info!(
            "Job search '{search_query}' returned {} postings ({received} received)",
            postings.len()
        );
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use crate::skills::{SkillVocabulary, VocabularyMatcher};

    fn skills() -> Arc<dyn SkillExtractor> {
        Arc::new(VocabularyMatcher::new(SkillVocabulary::default()).unwrap())
    }

    async fn fake_search(
        State(hits): State<Arc<AtomicUsize>>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        hits.fetch_add(1, Ordering::SeqCst);
        if headers.get("X-RapidAPI-Key").and_then(|v| v.to_str().ok()) != Some("good-key") {
            return (AxumStatus::FORBIDDEN, Json(json!({"message": "bad key"}))).into_response();
        }
        let query = params.get("query").cloned().unwrap_or_default();
        let pages = params.get("num_pages").cloned().unwrap_or_default();
        Json(json!({
            "status": "OK",
            "data": [
                {
                    "job_title": format!("{query} / {pages}"),
                    "employer_name": "Acme",
                    "job_description": "Python and SQL pipelines",
                },
                { "employer_name": "No Title Inc", "job_description": "orphan" }
            ]
        }))
        .into_response()
    }

    async fn spawn_fake() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/ok/search", get(fake_search))
            .route(
                "/limited/search",
                get(|| async { AxumStatus::TOO_MANY_REQUESTS }),
            )
            .route(
                "/broken/search",
                get(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }),
            )
            .route("/garbage/search", get(|| async { "<html>nope</html>" }))
            .route(
                "/bare/search",
                get(|| async {
                    Json(json!([{ "title": "Analyst", "description": "Excel reporting" }]))
                }),
            )
            .route(
                "/slow/search",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({ "data": [] }))
                }),
            )
            .with_state(Arc::clone(&hits));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hits)
    }

    fn client(base_url: String, key: Option<&str>) -> JSearchClient {
        JSearchClient::new(
            JobSourceConfig {
                base_url,
                host: "jsearch.p.rapidapi.com".to_string(),
                api_key: key.map(str::to_string),
                timeout: Duration::from_millis(300),
            },
            skills(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_query_and_normalizes() {
        let (base, hits) = spawn_fake().await;
        let request = SearchRequest {
            num_pages: 9,
            ..SearchRequest::new("data engineer", "Austin")
        };
        let jobs = client(format!("{base}/ok"), Some("good-key"))
            .search(&request)
            .await
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "data engineer in Austin / 5");
        assert!(jobs[0].skills_required.contains("Python"));
    }

    #[tokio::test]
    async fn test_missing_key_sends_no_request() {
        let (base, hits) = spawn_fake().await;
        for key in [None, Some("   ")] {
            let err = client(format!("{base}/ok"), key)
                .search(&SearchRequest::new("rust", ""))
                .await
                .unwrap_err();
            assert!(matches!(err, JobSourceError::MissingApiKey));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let err = client("http://127.0.0.1:9".to_string(), Some("good-key"))
            .search(&SearchRequest::new("  ", "Austin"))
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_invalid_key_is_unauthorized() {
        let (base, _) = spawn_fake().await;
        let err = client(format!("{base}/ok"), Some("wrong"))
            .search(&SearchRequest::new("rust", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::Unauthorized(403)));
    }

    #[tokio::test]
    async fn test_status_errors() {
        let (base, _) = spawn_fake().await;
        let request = SearchRequest::new("rust", "");

        let err = client(format!("{base}/limited"), Some("k"))
            .search(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::RateLimited));

        let err = client(format!("{base}/broken"), Some("k"))
            .search(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let (base, _) = spawn_fake().await;
        let err = client(format!("{base}/garbage"), Some("k"))
            .search(&SearchRequest::new("rust", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_bare_array_body() {
        let (base, _) = spawn_fake().await;
        let jobs = client(format!("{base}/bare"), Some("k"))
            .search(&SearchRequest::new("analyst", ""))
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Unknown Company");
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let (base, _) = spawn_fake().await;
        let err = client(format!("{base}/slow"), Some("k"))
            .search(&SearchRequest::new("rust", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, JobSourceError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = client(format!("http://{addr}"), Some("k"))
            .search(&SearchRequest::new("rust", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobSourceError::Transport(_) | JobSourceError::Timeout(_)
        ));
    }
}
