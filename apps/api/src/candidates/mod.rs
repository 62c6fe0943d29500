// Candidate listing and contact edits. Score fields are owned by the match
// orchestrator and never written from here.

pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateStatus};

#[derive(Debug, Default)]
pub struct CandidateFilter {
    pub jd_id: Option<Uuid>,
    pub status: Option<CandidateStatus>,
    pub search: Option<String>,
}

/// Contact and summary edits. `None` leaves a column unchanged.
#[derive(Debug, Default)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
}

/// Highest score first. `search` matches name, email or any skill.
pub async fn list_candidates(
    pool: &PgPool,
    filter: &CandidateFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<CandidateRow>, i64), AppError> {
    let pattern = filter
        .search
        .as_deref()
        .map(|s| format!("%{}%", s.trim()));
    let status = filter.status.map(|s| s.as_str());

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM candidates
        WHERE ($1::uuid IS NULL OR jd_id = $1)
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL
               OR name ILIKE $3
               OR email ILIKE $3
               OR EXISTS (SELECT 1 FROM unnest(skills) s WHERE s ILIKE $3))
        "#,
    )
    .bind(filter.jd_id)
    .bind(status)
    .bind(pattern.as_deref())
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT * FROM candidates
        WHERE ($1::uuid IS NULL OR jd_id = $1)
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL
               OR name ILIKE $3
               OR email ILIKE $3
               OR EXISTS (SELECT 1 FROM unnest(skills) s WHERE s ILIKE $3))
        ORDER BY match_score DESC, created_at
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(filter.jd_id)
    .bind(status)
    .bind(pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total))
}

pub async fn update_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
    update: &CandidateUpdate,
) -> Result<Option<CandidateRow>, AppError> {
    Ok(sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates
        SET name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            summary = COALESCE($4, summary),
            updated_at = NOW()
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(update.name.as_deref())
    .bind(update.email.as_deref())
    .bind(update.phone.as_deref())
    .bind(update.summary.as_deref())
    .bind(candidate_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn delete_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
