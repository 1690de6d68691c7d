use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::jobs::client::JobSourceError;
use crate::resume::extractor::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Job source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, shared by the error envelope and pipeline notices.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::Extraction(msg)
            | AppError::SourceUnavailable(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(name) => AppError::UnsupportedFormat(format!(
                "'{name}' is not a supported resume format (expected PDF or DOCX)"
            )),
            other => AppError::Extraction(other.to_string()),
        }
    }
}

impl From<JobSourceError> for AppError {
    fn from(err: JobSourceError) -> Self {
        match err {
            JobSourceError::EmptyQuery => AppError::Validation("query cannot be empty".to_string()),
            other => AppError::SourceUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::SourceUnavailable(msg) => {
                tracing::error!("Job source unavailable: {msg}");
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_maps_to_validation() {
        let err: AppError = JobSourceError::EmptyQuery.into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_missing_key_maps_to_source_unavailable() {
        let err: AppError = JobSourceError::MissingApiKey.into();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[test]
    fn test_unsupported_format_keeps_file_name() {
        let err: AppError = ExtractError::UnsupportedFormat("cv.txt".to_string()).into();
        assert!(err.user_message().contains("cv.txt"));
        assert_eq!(err.code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret stack detail"));
        assert!(!err.user_message().contains("secret"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::UnsupportedFormat("x".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (AppError::Extraction("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::SourceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
