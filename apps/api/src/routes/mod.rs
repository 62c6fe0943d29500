pub mod health;
pub mod pagination;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::candidates::handlers as candidates;
use crate::extraction::handlers as extraction;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/analyze", post(extraction::handle_analyze_jd))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Candidates
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route(
            "/api/v1/candidates/upload",
            post(candidates::handle_upload_candidates),
        )
        .route(
            "/api/v1/candidates/parse-resume",
            post(extraction::handle_parse_resume).layer(upload_limit),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        // Matching
        .route("/api/v1/matches", get(matching::handle_list_matches))
        .route(
            "/api/v1/matches/refresh",
            post(matching::handle_refresh_matches),
        )
        .route(
            "/api/v1/matches/explain",
            post(matching::handle_explain_match),
        )
        .route(
            "/api/v1/feedback",
            get(matching::handle_feedback_history).post(matching::handle_submit_feedback),
        )
        .route(
            "/api/v1/feedback/weight",
            post(matching::handle_preview_weight),
        )
        // Analytics
        .route("/api/v1/analytics/overview", get(analytics::handle_overview))
        .route(
            "/api/v1/analytics/match-distribution",
            get(analytics::handle_match_distribution),
        )
        .route(
            "/api/v1/analytics/top-skills",
            get(analytics::handle_top_skills),
        )
        .route(
            "/api/v1/analytics/learning-insights",
            get(analytics::handle_learning_insights),
        )
        .with_state(state)
}
