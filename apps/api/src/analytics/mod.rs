pub mod handlers;
pub mod insights;

use sqlx::{FromRow, PgPool};

use crate::errors::AppError;

/// The candidate columns every dashboard aggregate reads.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateStats {
    pub match_score: i32,
    pub status: String,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
}

pub async fn load_candidate_stats(pool: &PgPool) -> Result<Vec<CandidateStats>, AppError> {
    Ok(sqlx::query_as::<_, CandidateStats>(
        "SELECT match_score, status, skills, experience_years FROM candidates ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn count_jobs(pool: &PgPool) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM job_descriptions")
        .fetch_one(pool)
        .await?)
}

pub async fn latest_job_role(pool: &PgPool) -> Result<Option<String>, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT role FROM job_descriptions ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?)
}
