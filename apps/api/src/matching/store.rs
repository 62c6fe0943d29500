//! Storage seam for the matching engine.
//!
//! `AppState` carries an `Arc<dyn MatchStore>`. Production uses `PgMatchStore`;
//! tests swap in the in-memory store without touching the orchestrator.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::feedback::adapt_weight;
use crate::models::candidate::{CandidateRow, CandidateStatus, MatchUpdate, NewCandidate};
use crate::models::feedback::{FeedbackRow, NewFeedback};
use crate::models::job::JobRow;

/// Result of the atomic apply-feedback transaction.
#[derive(Debug, Clone)]
pub struct AppliedFeedback {
    pub event: FeedbackRow,
    pub candidate: CandidateRow,
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError>;

    async fn get_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError>;

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<CandidateRow>, AppError>;

    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, AppError>;

    /// Writes back score and skill fields if the row's `feedback_weight` still
    /// equals `scored_weight`. Returns `false` without writing when feedback
    /// has moved the weight since the row was read.
    async fn save_match(
        &self,
        candidate_id: Uuid,
        scored_weight: f64,
        update: &MatchUpdate,
    ) -> Result<bool, AppError>;

    /// Reads the candidate's weight, adapts it, writes status + weight and
    /// appends the event, all as one unit. Concurrent calls for the same
    /// candidate are serialized. Returns `None` when the candidate does not
    /// exist under the given job.
    async fn apply_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> Result<Option<AppliedFeedback>, AppError>;
}

pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM job_descriptions WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<CandidateRow>, AppError> {
        Ok(sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE jd_id = $1 ORDER BY created_at, id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, jd_id, name, email, phone, summary, raw_resume_text, skills, experience_years)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.jd_id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(candidate.phone.as_deref())
        .bind(candidate.summary.as_deref())
        .bind(candidate.raw_resume_text.as_deref())
        .bind(candidate.skills.as_slice())
        .bind(candidate.experience_years)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted candidate {} for job {}", row.id, row.jd_id);
        Ok(row)
    }

    async fn save_match(
        &self,
        candidate_id: Uuid,
        scored_weight: f64,
        update: &MatchUpdate,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE candidates
            SET match_score = $1,
                score_degraded = $2,
                matched_skills = $3,
                missing_skills = $4,
                updated_at = NOW()
            WHERE id = $5 AND feedback_weight = $6
            "#,
        )
        .bind(update.match_score)
        .bind(update.score_degraded)
        .bind(update.matched_skills.as_slice())
        .bind(update.missing_skills.as_slice())
        .bind(candidate_id)
        .bind(scored_weight)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE id = $1)")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(AppError::NotFound(format!(
                "Candidate {candidate_id} not found"
            )));
        }
        Ok(false)
    }

    async fn apply_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> Result<Option<AppliedFeedback>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent feedback for this candidate.
        let weight_before: Option<f64> = sqlx::query_scalar(
            "SELECT feedback_weight FROM candidates WHERE id = $1 AND jd_id = $2 FOR UPDATE",
        )
        .bind(feedback.candidate_id)
        .bind(feedback.jd_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(weight_before) = weight_before else {
            return Ok(None);
        };
        let weight_after = adapt_weight(weight_before, feedback.action);

        let candidate = sqlx::query_as::<_, CandidateRow>(
            r#"
            UPDATE candidates
            SET status = $1, feedback_weight = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(CandidateStatus::from(feedback.action).as_str())
        .bind(weight_after)
        .bind(feedback.candidate_id)
        .fetch_one(&mut *tx)
        .await?;

        let event = sqlx::query_as::<_, FeedbackRow>(
            r#"
            INSERT INTO feedback_events
                (id, jd_id, candidate_id, action, notes, weight_before, weight_after)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(feedback.jd_id)
        .bind(feedback.candidate_id)
        .bind(feedback.action.as_str())
        .bind(feedback.notes.as_deref())
        .bind(weight_before)
        .bind(weight_after)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            "Applied {} to candidate {}: weight {weight_before:.4} -> {weight_after:.4}",
            feedback.action, feedback.candidate_id
        );
        Ok(Some(AppliedFeedback { event, candidate }))
    }
}

/// Feedback history, newest first, optionally narrowed by job and/or candidate.
pub async fn list_feedback(
    pool: &PgPool,
    jd_id: Option<Uuid>,
    candidate_id: Option<Uuid>,
) -> Result<Vec<FeedbackRow>, AppError> {
    Ok(sqlx::query_as::<_, FeedbackRow>(
        r#"
        SELECT * FROM feedback_events
        WHERE ($1::uuid IS NULL OR jd_id = $1)
          AND ($2::uuid IS NULL OR candidate_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(jd_id)
    .bind(candidate_id)
    .fetch_all(pool)
    .await?)
}
