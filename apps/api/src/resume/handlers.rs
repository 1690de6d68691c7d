//! Axum route handlers for the Resume API.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::resume::extractor::{extract_text, DocumentFormat};
use crate::resume::{ResumeDocument, ResumeView};
use crate::state::AppState;

pub const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PastedResumeRequest {
    pub text: String,
}

/// A multipart body split into the resume file and any plain text fields.
#[derive(Debug, Default)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Option<Bytes>,
    pub fields: HashMap<String, String>,
}

impl ResumeUpload {
    /// Reads every part; the `resume` part is kept as bytes, the rest as text.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut upload = ResumeUpload::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == RESUME_FIELD {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                upload.data = Some(data);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
                upload.fields.insert(name, value);
            }
        }

        Ok(upload)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Extracts the uploaded file into a `ResumeDocument`.
    pub async fn into_document(self, state: &AppState) -> Result<ResumeDocument, AppError> {
        let Some(data) = self.data else {
            return Err(AppError::Validation(format!(
                "multipart field '{RESUME_FIELD}' is required"
            )));
        };

        let format = DocumentFormat::detect(self.file_name.as_deref(), self.content_type.as_deref())?;
        tracing::info!(
            "Extracting {:?} resume ({} bytes)",
            format,
            data.len()
        );
        let text = extract_text(format, data).await?;
        Ok(ResumeDocument::new(text, state.skills.as_ref()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/upload
///
/// Multipart upload with a PDF or DOCX in the `resume` field.
/// Returns the extracted text, skills, stats, preview, and keywords.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeView>, AppError> {
    let upload = ResumeUpload::read(multipart).await?;
    let resume = upload.into_document(&state).await?;
    Ok(Json(ResumeView::build(resume, &state.skills)))
}

/// POST /api/v1/resume/text
///
/// Pasted resume text (at least 50 characters once cleaned).
pub async fn handle_text(
    State(state): State<AppState>,
    Json(request): Json<PastedResumeRequest>,
) -> Result<Json<ResumeView>, AppError> {
    let resume = ResumeDocument::from_pasted_text(&request.text, state.skills.as_ref())?;
    Ok(Json(ResumeView::build(resume, &state.skills)))
}
