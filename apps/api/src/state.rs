use std::sync::Arc;

use crate::config::Config;
use crate::jobs::client::JobSource;
use crate::matching::matcher::MatchScorer;
use crate::skills::VocabularyMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// JSearch client, wrapped in `CachedJobSource` when a cache TTL is set.
    pub job_source: Arc<dyn JobSource>,
    /// Compiled skill vocabulary shared by resume and job normalization.
    pub skills: Arc<VocabularyMatcher>,
    /// Pluggable ranker. Default: TfIdfJaccardScorer.
    pub scorer: Arc<dyn MatchScorer>,
}
