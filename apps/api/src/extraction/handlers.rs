//! Axum route handlers for text extraction. Nothing here is persisted.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::jd_analyzer::{analyze_job_description, JobAnalysis};
use crate::extraction::resume_parser::{extract_candidate_info, extract_resume_text};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJdResponse {
    #[serde(flatten)]
    pub analysis: JobAnalysis,
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParsedResumeResponse {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_text: String,
    pub skills: Vec<String>,
    pub experience_years: f64,
}

/// POST /api/v1/jobs/analyze
///
/// Previews what would be extracted from a job description before it is saved.
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<AnalyzeJdResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let analysis = analyze_job_description(&request.jd_text, &state.lexicon);
    Ok(Json(AnalyzeJdResponse {
        analysis,
        raw_text: request.jd_text,
    }))
}

/// POST /api/v1/candidates/parse-resume
///
/// Accepts a multipart `file` field (PDF or plain text) and returns extracted fields.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((content_type, data));
        break;
    }

    let (content_type, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "File exceeds {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let resume_text = extract_resume_text(&content_type, &data)?;
    let info = extract_candidate_info(&resume_text, &state.lexicon);

    Ok(Json(ParsedResumeResponse {
        name: info.name.unwrap_or_default(),
        email: info.email.unwrap_or_default(),
        phone: info.phone.unwrap_or_default(),
        resume_text,
        skills: info.skills,
        experience_years: info.experience_years.unwrap_or(0.0),
    }))
}
