use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::candidates::{
    delete_candidate, list_candidates, update_candidate, CandidateFilter, CandidateUpdate,
};
use crate::errors::AppError;
use crate::extraction::lexicon::SkillLexicon;
use crate::extraction::resume_parser::{extract_candidate_info, generate_candidate_summary};
use crate::matching::orchestrator::MatchSummary;
use crate::models::candidate::{CandidateRow, CandidateStatus, NewCandidate};
use crate::routes::pagination::{Page, PageParams};
use crate::state::AppState;

const UNKNOWN_NAME: &str = "Unknown";
const PLACEHOLDER_EMAIL: &str = "noemail@example.com";

#[derive(Debug, Deserialize)]
pub struct CandidateUpload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadCandidatesRequest {
    pub jd_id: Uuid,
    pub candidates: Vec<CandidateUpload>,
}

#[derive(Debug, Serialize)]
pub struct UploadCandidatesResponse {
    pub jd_id: Uuid,
    pub saved_count: usize,
    pub candidates: Vec<MatchSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateListQuery {
    pub jd_id: Option<Uuid>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCandidateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builds the insert payload for one uploaded resume. Fields supplied by the
/// client win over extracted ones.
pub fn prepare_candidate(jd_id: Uuid, upload: CandidateUpload, lexicon: &SkillLexicon) -> NewCandidate {
    let info = extract_candidate_info(&upload.resume_text, lexicon);

    let name = non_blank(upload.name)
        .or(info.name)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let email = non_blank(upload.email)
        .or(info.email)
        .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
    let phone = non_blank(upload.phone).or(info.phone);
    let summary = generate_candidate_summary(&name, info.experience_years, &info.skills);

    NewCandidate {
        jd_id,
        name,
        email,
        phone,
        summary: Some(summary),
        raw_resume_text: Some(upload.resume_text).filter(|t| !t.trim().is_empty()),
        skills: info.skills,
        experience_years: info.experience_years,
    }
}

/// POST /api/v1/candidates/upload
///
/// Registers each resume against the job and scores it immediately.
pub async fn handle_upload_candidates(
    State(state): State<AppState>,
    Json(request): Json<UploadCandidatesRequest>,
) -> Result<(StatusCode, Json<UploadCandidatesResponse>), AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation(
            "candidates must contain at least one entry".to_string(),
        ));
    }
    state.matcher.load_job(request.jd_id).await?;

    let mut saved = Vec::with_capacity(request.candidates.len());
    for upload in request.candidates {
        let candidate = prepare_candidate(request.jd_id, upload, &state.lexicon);
        saved.push(state.matcher.register_candidate(candidate).await?);
    }

    info!("Uploaded {} candidates for job {}", saved.len(), request.jd_id);
    Ok((
        StatusCode::CREATED,
        Json(UploadCandidatesResponse {
            jd_id: request.jd_id,
            saved_count: saved.len(),
            candidates: saved,
        }),
    ))
}

/// GET /api/v1/candidates?jd_id=&status=&search=&page=&limit=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(params): Query<CandidateListQuery>,
) -> Result<Json<Page<CandidateRow>>, AppError> {
    let (page, limit, offset) = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve(20)?;

    let status = params
        .status
        .as_deref()
        .map(str::parse::<CandidateStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let filter = CandidateFilter {
        jd_id: params.jd_id,
        status,
        search: non_blank(params.search),
    };
    let (items, total) = list_candidates(&state.db, &filter, limit, offset).await?;
    Ok(Json(Page { items, page, total }))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    state
        .store
        .get_candidate(candidate_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

/// PUT /api/v1/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(request): Json<UpdateCandidateRequest>,
) -> Result<Json<CandidateRow>, AppError> {
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if request.email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(AppError::Validation("email is not valid".to_string()));
    }

    let update = CandidateUpdate {
        name: request.name.map(|n| n.trim().to_string()),
        email: request.email.map(|e| e.trim().to_string()),
        phone: request.phone,
        summary: request.summary,
    };

    update_candidate(&state.db, candidate_id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

/// DELETE /api/v1/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_candidate(&state.db, candidate_id).await? {
        return Err(AppError::NotFound(format!(
            "Candidate {candidate_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: Option<&str>, email: Option<&str>, resume: &str) -> CandidateUpload {
        CandidateUpload {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            phone: None,
            resume_text: resume.to_string(),
        }
    }

    #[test]
    fn test_extraction_fills_missing_contact_fields() {
        let resume = "Dana Scully\ndana@fbi.gov\n+1 555 123 4567\n\
                      6+ years of experience with React and TypeScript.";
        let candidate = prepare_candidate(Uuid::new_v4(), upload(None, None, resume), &SkillLexicon::builtin());

        assert_eq!(candidate.name, "Dana Scully");
        assert_eq!(candidate.email, "dana@fbi.gov");
        assert_eq!(candidate.experience_years, Some(6.0));
        assert!(candidate.skills.contains(&"React".to_string()));
        assert!(candidate.summary.is_some());
    }

    #[test]
    fn test_client_fields_win_over_extraction() {
        let resume = "Dana Scully\ndana@fbi.gov";
        let candidate = prepare_candidate(
            Uuid::new_v4(),
            upload(Some("Fox Mulder"), Some("fox@fbi.gov"), resume),
            &SkillLexicon::builtin(),
        );
        assert_eq!(candidate.name, "Fox Mulder");
        assert_eq!(candidate.email, "fox@fbi.gov");
    }

    #[test]
    fn test_defaults_when_nothing_is_found() {
        let candidate = prepare_candidate(Uuid::new_v4(), upload(Some("  "), None, ""), &SkillLexicon::builtin());
        assert_eq!(candidate.name, UNKNOWN_NAME);
        assert_eq!(candidate.email, PLACEHOLDER_EMAIL);
        assert!(candidate.skills.is_empty());
        assert_eq!(candidate.raw_resume_text, None);
    }
}
