mod analytics;
mod config;
mod errors;
mod jobs;
mod matching;
mod pipeline;
mod resume;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::cache::CachedJobSource;
use crate::jobs::client::{JSearchClient, JobSource};
use crate::matching::matcher::TfIdfJaccardScorer;
use crate::routes::build_router;
use crate::skills::{SkillVocabulary, VocabularyMatcher};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Compile the skill vocabulary once; shared by resumes and job normalization
    let skills = Arc::new(
        VocabularyMatcher::new(SkillVocabulary::default())
            .context("failed to compile skill vocabulary")?,
    );
    if skills.vocabulary().is_empty() {
        tracing::warn!("Skill vocabulary is empty; skill overlap will score 0 for every job");
    } else {
        info!("Skill vocabulary loaded ({} skills)", skills.vocabulary().len());
    }

    // Initialize job source (JSearch), optionally behind the TTL cache
    if config.rapidapi_key.is_none() {
        tracing::warn!("RAPIDAPI_KEY is not set; job searches will report the source as unavailable");
    }
    let client = JSearchClient::new(config.job_source(), skills.clone())
        .context("failed to build job search client")?;
    let job_source: Arc<dyn JobSource> = match config.cache_ttl() {
        Some(ttl) => {
            info!("Job search cache enabled (ttl: {}s)", ttl.as_secs());
            Arc::new(CachedJobSource::new(Arc::new(client), ttl))
        }
        None => Arc::new(client),
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        job_source,
        skills,
        scorer: Arc::new(TfIdfJaccardScorer::default()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
