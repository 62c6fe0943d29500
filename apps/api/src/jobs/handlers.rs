use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::{delete_job, insert_job, list_jobs, update_job, JobUpdate, NewJob};
use crate::models::job::JobRow;
use crate::routes::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub role: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub good_to_have: Vec<String>,
    pub experience_level: Option<String>,
    pub summary: Option<String>,
    pub raw_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub role: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub good_to_have: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateJobResponse {
    pub job: JobRow,
    /// Present when the update changed requirements and scores were recomputed.
    pub recalculated_candidates: Option<usize>,
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let role = request.role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    let required_skills = clean_skills(request.required_skills);
    let good_to_have = clean_skills(request.good_to_have);

    let job = insert_job(
        &state.db,
        NewJob {
            role,
            required_skills: &required_skills,
            good_to_have: &good_to_have,
            experience_level: request.experience_level.as_deref(),
            summary: request.summary.as_deref(),
            raw_text: request.raw_text.as_deref(),
        },
    )
    .await?;

    tracing::info!("Created job {} ({})", job.id, job.role);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?search=&page=&limit=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Page<JobRow>>, AppError> {
    let (page, limit, offset) = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve(10)?;
    let search = params.search.as_deref().filter(|s| !s.trim().is_empty());
    let (items, total) = list_jobs(&state.db, search, limit, offset).await?;
    Ok(Json(Page { items, page, total }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(state.matcher.load_job(job_id).await?))
}

/// PUT /api/v1/jobs/:id
///
/// Requirement changes trigger a recompute of the job's candidate pool.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<UpdateJobResponse>, AppError> {
    if request.role.as_deref().is_some_and(|r| r.trim().is_empty()) {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let update = JobUpdate {
        role: request.role.map(|r| r.trim().to_string()),
        required_skills: request.required_skills.map(clean_skills),
        good_to_have: request.good_to_have.map(clean_skills),
        experience_level: request.experience_level,
        summary: request.summary,
    };

    let job = update_job(&state.db, job_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job description {job_id} not found")))?;

    let recalculated_candidates = if update.touches_requirements() {
        Some(state.matcher.recompute_all(job_id).await?.len())
    } else {
        None
    };

    Ok(Json(UpdateJobResponse {
        job,
        recalculated_candidates,
    }))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_job(&state.db, job_id).await? {
        return Err(AppError::NotFound(format!(
            "Job description {job_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
