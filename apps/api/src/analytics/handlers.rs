use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analytics::insights::{
    learning_insights, match_distribution, overview, top_skills, Overview, ScoreBucket, SkillCount,
};
use crate::analytics::{count_jobs, latest_job_role, load_candidate_stats};
use crate::errors::AppError;
use crate::models::candidate::CandidateStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TopSkillsQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub buckets: Vec<ScoreBucket>,
}

#[derive(Debug, Serialize)]
pub struct TopSkillsResponse {
    pub skills: Vec<SkillCount>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

/// `all` or absent means no filter; only shortlisted and hired narrow it.
fn parse_skill_filter(filter: Option<&str>) -> Result<Option<CandidateStatus>, AppError> {
    match filter.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => match value.parse::<CandidateStatus>() {
            Ok(status @ (CandidateStatus::Shortlisted | CandidateStatus::Hired)) => Ok(Some(status)),
            _ => Err(AppError::Validation(format!(
                "filter must be one of all, shortlisted, hired (got '{value}')"
            ))),
        },
    }
}

/// GET /api/v1/analytics/overview
pub async fn handle_overview(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    let (total_jds, candidates) =
        tokio::try_join!(count_jobs(&state.db), load_candidate_stats(&state.db))?;
    Ok(Json(overview(total_jds, &candidates)))
}

/// GET /api/v1/analytics/match-distribution
pub async fn handle_match_distribution(
    State(state): State<AppState>,
) -> Result<Json<DistributionResponse>, AppError> {
    let candidates = load_candidate_stats(&state.db).await?;
    Ok(Json(DistributionResponse {
        buckets: match_distribution(&candidates),
    }))
}

/// GET /api/v1/analytics/top-skills?filter=all|shortlisted|hired
pub async fn handle_top_skills(
    State(state): State<AppState>,
    Query(params): Query<TopSkillsQuery>,
) -> Result<Json<TopSkillsResponse>, AppError> {
    let status = parse_skill_filter(params.filter.as_deref())?;
    let candidates = load_candidate_stats(&state.db).await?;
    Ok(Json(TopSkillsResponse {
        skills: top_skills(&candidates, status),
    }))
}

/// GET /api/v1/analytics/learning-insights
pub async fn handle_learning_insights(
    State(state): State<AppState>,
) -> Result<Json<InsightsResponse>, AppError> {
    let (candidates, latest_role) =
        tokio::try_join!(load_candidate_stats(&state.db), latest_job_role(&state.db))?;
    Ok(Json(InsightsResponse {
        insights: learning_insights(&candidates, latest_role.as_deref()),
    }))
}
