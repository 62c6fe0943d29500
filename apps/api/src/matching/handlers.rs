//! Axum route handlers for the Matching and Feedback API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::explanation::MatchExplanation;
use crate::matching::feedback::{adapt_weight_str, multiplier_for, FeedbackAction};
use crate::matching::orchestrator::{FeedbackOutcome, MatchSummary};
use crate::matching::store::list_feedback;
use crate::models::candidate::{CandidateRow, CandidateStatus};
use crate::models::feedback::{FeedbackRow, NewFeedback};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub jd_id: Uuid,
    pub min_score: Option<u32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub jd_id: Uuid,
    pub candidates: Vec<MatchSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub jd_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub jd_id: Uuid,
    pub recalculated: bool,
    pub updated_candidates: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub jd_id: Uuid,
    pub candidate_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub jd_id: Uuid,
    pub candidate_id: Uuid,
    pub action: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub jd_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackHistoryResponse {
    pub items: Vec<FeedbackRow>,
}

#[derive(Debug, Deserialize)]
pub struct WeightPreviewRequest {
    pub current_weight: f64,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct WeightPreviewResponse {
    pub multiplier: f64,
    pub new_weight: f64,
}

/// Filters persisted candidates and orders them best match first.
pub fn rank_candidates(
    candidates: &[CandidateRow],
    min_score: Option<u32>,
    status: Option<CandidateStatus>,
) -> Vec<MatchSummary> {
    let mut ranked: Vec<MatchSummary> = candidates
        .iter()
        .filter(|c| min_score.map_or(true, |min| c.match_score >= min as i32))
        .filter(|c| status.map_or(true, |s| c.status == s.as_str()))
        .map(MatchSummary::from)
        .collect();
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/matches?jd_id=&min_score=&status=
///
/// Ranked candidates for a job, from persisted scores (no recompute).
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchListQuery>,
) -> Result<Json<MatchListResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<CandidateStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    state.matcher.load_job(params.jd_id).await?;
    let candidates = state.store.list_candidates_for_job(params.jd_id).await?;

    Ok(Json(MatchListResponse {
        jd_id: params.jd_id,
        candidates: rank_candidates(&candidates, params.min_score, status),
    }))
}

/// POST /api/v1/matches/refresh
pub async fn handle_refresh_matches(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let summaries = state.matcher.recompute_all(request.jd_id).await?;
    Ok(Json(RefreshResponse {
        jd_id: request.jd_id,
        recalculated: true,
        updated_candidates: summaries.len(),
    }))
}

/// POST /api/v1/matches/explain
pub async fn handle_explain_match(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<MatchExplanation>, AppError> {
    let explanation = state
        .matcher
        .explain(request.candidate_id, request.jd_id)
        .await?;
    Ok(Json(explanation))
}

/// POST /api/v1/feedback
///
/// Records a recruiter action, adapts the candidate's weight and rescores them.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackOutcome>), AppError> {
    let action: FeedbackAction = request.action.parse().map_err(AppError::Validation)?;

    let outcome = state
        .matcher
        .submit_feedback(NewFeedback {
            jd_id: request.jd_id,
            candidate_id: request.candidate_id,
            action,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/v1/feedback?jd_id=&candidate_id=
pub async fn handle_feedback_history(
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
) -> Result<Json<FeedbackHistoryResponse>, AppError> {
    let items = list_feedback(&state.db, params.jd_id, params.candidate_id).await?;
    Ok(Json(FeedbackHistoryResponse { items }))
}

/// POST /api/v1/feedback/weight
///
/// Stateless weight adaptation; unrecognised actions leave the weight unchanged.
pub async fn handle_preview_weight(
    Json(request): Json<WeightPreviewRequest>,
) -> Result<Json<WeightPreviewResponse>, AppError> {
    if !request.current_weight.is_finite() || request.current_weight <= 0.0 {
        return Err(AppError::Validation(
            "current_weight must be a positive number".to_string(),
        ));
    }
    Ok(Json(WeightPreviewResponse {
        multiplier: multiplier_for(&request.action),
        new_weight: adapt_weight_str(request.current_weight, &request.action),
    }))
}
