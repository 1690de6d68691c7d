use std::time::Duration;

use anyhow::{Context, Result};

use crate::jobs::client::JobSourceConfig;

const DEFAULT_JOBS_API_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
const DEFAULT_JOBS_API_HOST: &str = "jsearch.p.rapidapi.com";

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; a missing `RAPIDAPI_KEY` is allowed and
/// makes every search report the job source as unavailable.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub rapidapi_key: Option<String>,
    pub jobs_api_base_url: String,
    pub jobs_api_host: String,
    pub jobs_api_timeout_secs: u64,
    pub jobs_cache_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            rapidapi_key: optional_env("RAPIDAPI_KEY"),
            jobs_api_base_url: std::env::var("JOBS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_JOBS_API_BASE_URL.to_string()),
            jobs_api_host: std::env::var("JOBS_API_HOST")
                .unwrap_or_else(|_| DEFAULT_JOBS_API_HOST.to_string()),
            jobs_api_timeout_secs: parse_env("JOBS_API_TIMEOUT_SECS", 15)?,
            jobs_cache_ttl_secs: parse_env("JOBS_CACHE_TTL_SECS", 600)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    /// Explicit job source settings handed to the client constructor.
    pub fn job_source(&self) -> JobSourceConfig {
        JobSourceConfig {
            base_url: self.jobs_api_base_url.trim_end_matches('/').to_string(),
            host: self.jobs_api_host.clone(),
            api_key: self.rapidapi_key.clone(),
            timeout: Duration::from_secs(self.jobs_api_timeout_secs),
        }
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.jobs_cache_ttl_secs > 0).then(|| Duration::from_secs(self.jobs_cache_ttl_secs))
    }
}

/// Returns the trimmed value of `key`, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
