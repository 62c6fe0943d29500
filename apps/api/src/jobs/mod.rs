// Job descriptions: storage queries. Matching reads jobs through `MatchStore`.

pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;

pub struct NewJob<'a> {
    pub role: &'a str,
    pub required_skills: &'a [String],
    pub good_to_have: &'a [String],
    pub experience_level: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub raw_text: Option<&'a str>,
}

/// Partial update; `None` leaves a column unchanged.
#[derive(Debug, Default)]
pub struct JobUpdate {
    pub role: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub good_to_have: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub summary: Option<String>,
}

impl JobUpdate {
    /// True when the change can move candidate scores.
    pub fn touches_requirements(&self) -> bool {
        self.required_skills.is_some()
            || self.good_to_have.is_some()
            || self.experience_level.is_some()
    }
}

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> Result<JobRow, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO job_descriptions
            (id, role, required_skills, good_to_have, experience_level, summary, raw_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.role)
    .bind(job.required_skills)
    .bind(job.good_to_have)
    .bind(job.experience_level)
    .bind(job.summary)
    .bind(job.raw_text)
    .fetch_one(pool)
    .await?)
}

/// Newest first. `search` matches the role or any required skill, case-insensitively.
pub async fn list_jobs(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<JobRow>, i64), AppError> {
    let pattern = search.map(|s| format!("%{}%", s.trim()));

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM job_descriptions
        WHERE $1::text IS NULL
           OR role ILIKE $1
           OR EXISTS (SELECT 1 FROM unnest(required_skills) s WHERE s ILIKE $1)
        "#,
    )
    .bind(pattern.as_deref())
    .fetch_one(pool)
    .await?;

    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM job_descriptions
        WHERE $1::text IS NULL
           OR role ILIKE $1
           OR EXISTS (SELECT 1 FROM unnest(required_skills) s WHERE s ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((jobs, total))
}

pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    update: &JobUpdate,
) -> Result<Option<JobRow>, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE job_descriptions
        SET role = COALESCE($1, role),
            required_skills = COALESCE($2, required_skills),
            good_to_have = COALESCE($3, good_to_have),
            experience_level = COALESCE($4, experience_level),
            summary = COALESCE($5, summary),
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(update.role.as_deref())
    .bind(update.required_skills.as_deref())
    .bind(update.good_to_have.as_deref())
    .bind(update.experience_level.as_deref())
    .bind(update.summary.as_deref())
    .bind(job_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM job_descriptions WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_changes_are_detected() {
        assert!(!JobUpdate::default().touches_requirements());
        assert!(!JobUpdate {
            role: Some("Staff Engineer".to_string()),
            ..Default::default()
        }
        .touches_requirements());
        assert!(JobUpdate {
            experience_level: Some("5+ years".to_string()),
            ..Default::default()
        }
        .touches_requirements());
    }
}
