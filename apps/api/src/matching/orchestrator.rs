//! Match orchestrator: loads records, runs comparison + scoring, applies the
//! candidate's feedback weight and writes the result back.
//!
//! Each candidate's computation touches only its own row, so a job's pool is
//! recomputed concurrently and joined before anything is returned.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::explanation::{explain_match, MatchExplanation};
use crate::matching::scoring::{apply_feedback_weight, calculate_raw_score, ScoreInput, ScoreOutcome};
use crate::matching::skills::compare_skills;
use crate::matching::store::MatchStore;
use crate::models::candidate::{CandidateRow, MatchUpdate, NewCandidate};
use crate::models::feedback::{FeedbackRow, NewFeedback};
use crate::models::job::JobRow;

/// Caller-visible view of a candidate's current match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub candidate_id: Uuid,
    pub name: String,
    pub email: String,
    pub match_score: u32,
    /// True when the score is the neutral fallback rather than a computed value.
    pub degraded: bool,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: Option<String>,
    pub status: String,
    pub experience_years: Option<f64>,
    pub feedback_weight: f64,
}

impl From<&CandidateRow> for MatchSummary {
    fn from(row: &CandidateRow) -> Self {
        Self {
            candidate_id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            match_score: row.match_score.clamp(0, 100) as u32,
            degraded: row.score_degraded,
            matched_skills: row.matched_skills.clone(),
            missing_skills: row.missing_skills.clone(),
            summary: row.summary.clone(),
            status: row.status.clone(),
            experience_years: row.experience_years,
            feedback_weight: row.feedback_weight,
        }
    }
}

/// A recompute batch stopped on one candidate. Carries what did succeed.
#[derive(Debug, Error)]
#[error("recompute of job {job_id} failed for candidate {candidate_id}: {source}")]
pub struct BatchRecomputeError {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub source: AppError,
    pub completed: Vec<MatchSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub event: FeedbackRow,
    #[serde(rename = "match")]
    pub summary: MatchSummary,
}

/// Pure evaluation of one candidate against one job.
pub fn evaluate(candidate: &CandidateRow, job: &JobRow) -> (MatchUpdate, ScoreOutcome) {
    let outcome = calculate_raw_score(&ScoreInput {
        candidate_skills: &candidate.skills,
        required_skills: &job.required_skills,
        good_to_have: &job.good_to_have,
        experience_years: candidate.experience_years,
        experience_band: job.experience_level.as_deref(),
    });
    let comparison = compare_skills(&candidate.skills, &job.required_skills, &job.good_to_have);
    let final_score = apply_feedback_weight(outcome.score, candidate.feedback_weight);

    let update = MatchUpdate {
        match_score: final_score as i32,
        score_degraded: outcome.is_degraded(),
        matched_skills: comparison.matched_skills,
        missing_skills: comparison.missing_required,
    };
    (update, outcome)
}

/// Write attempts per candidate before concurrent feedback is reported as an error.
const MAX_SAVE_ATTEMPTS: usize = 3;

pub struct MatchOrchestrator {
    store: Arc<dyn MatchStore>,
    concurrency: usize,
}

impl MatchOrchestrator {
    pub fn new(store: Arc<dyn MatchStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn load_job(&self, job_id: Uuid) -> Result<JobRow, AppError> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job description {job_id} not found")))
    }

    /// Loads a candidate, treating a candidate registered under another job as absent.
    pub async fn load_candidate(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<CandidateRow, AppError> {
        self.store
            .get_candidate(candidate_id)
            .await?
            .filter(|c| c.jd_id == job_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Candidate {candidate_id} not found for job {job_id}"
                ))
            })
    }

    pub async fn compute_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<MatchSummary, AppError> {
        let job = self.load_job(job_id).await?;
        let candidate = self.load_candidate(candidate_id, job_id).await?;
        self.score_and_persist(&candidate, &job).await
    }

    /// Scores the row and writes it back. When feedback moves the weight
    /// between the read and the write, the row is reloaded and rescored so
    /// the stored score always uses the stored weight.
    async fn score_and_persist(
        &self,
        candidate: &CandidateRow,
        job: &JobRow,
    ) -> Result<MatchSummary, AppError> {
        let mut reloaded: Option<CandidateRow> = None;

        for _ in 0..MAX_SAVE_ATTEMPTS {
            let row = reloaded.as_ref().unwrap_or(candidate);
            let (update, outcome) = evaluate(row, job);

            if self
                .store
                .save_match(row.id, row.feedback_weight, &update)
                .await?
            {
                debug!(
                    "Candidate {} scored raw {} -> final {} (weight {:.4}, degraded: {})",
                    row.id,
                    outcome.score,
                    update.match_score,
                    row.feedback_weight,
                    update.score_degraded
                );

                let mut summary = MatchSummary::from(row);
                summary.match_score = update.match_score as u32;
                summary.degraded = update.score_degraded;
                summary.matched_skills = update.matched_skills;
                summary.missing_skills = update.missing_skills;
                return Ok(summary);
            }

            debug!("Weight of candidate {} changed while scoring; rescoring", row.id);
            reloaded = Some(self.load_candidate(candidate.id, candidate.jd_id).await?);
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "feedback weight of candidate {} kept changing during {MAX_SAVE_ATTEMPTS} scoring attempts",
            candidate.id
        )))
    }

    /// Recomputes every candidate of a job. Stops at the first failing
    /// candidate (in candidate order) and reports it with the summaries that
    /// completed before it. Candidates already in flight at that point are
    /// dropped; a write any of them made still used the current weight.
    pub async fn recompute_all(&self, job_id: Uuid) -> Result<Vec<MatchSummary>, AppError> {
        let job = self.load_job(job_id).await?;
        let candidates = self.store.list_candidates_for_job(job_id).await?;
        let job = &job;

        let scoring: Vec<_> = candidates
            .iter()
            .map(|candidate| async move {
                (candidate.id, self.score_and_persist(candidate, job).await)
            })
            .collect();
        let mut results = stream::iter(scoring).buffered(self.concurrency);

        let mut completed = Vec::with_capacity(candidates.len());
        while let Some((candidate_id, result)) = results.next().await {
            match result {
                Ok(summary) => completed.push(summary),
                Err(source) => {
                    warn!(
                        "Recompute of job {job_id} failed at candidate {candidate_id}; {} of {} completed",
                        completed.len(),
                        candidates.len()
                    );
                    return Err(AppError::BatchRecompute(Box::new(BatchRecomputeError {
                        job_id,
                        candidate_id,
                        source,
                        completed,
                    })));
                }
            }
        }

        info!("Recomputed {} candidates for job {job_id}", completed.len());
        Ok(completed)
    }

    /// Explains the persisted match; does not recompute.
    pub async fn explain(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<MatchExplanation, AppError> {
        let job = self.load_job(job_id).await?;
        let candidate = self.load_candidate(candidate_id, job_id).await?;
        Ok(explain_match(&MatchSummary::from(&candidate), &job))
    }

    /// Registers a candidate against an existing job and scores it immediately.
    pub async fn register_candidate(
        &self,
        candidate: NewCandidate,
    ) -> Result<MatchSummary, AppError> {
        let job = self.load_job(candidate.jd_id).await?;
        let row = self.store.insert_candidate(candidate).await?;
        self.score_and_persist(&row, &job).await
    }

    /// Applies one feedback event atomically, then recomputes that candidate.
    pub async fn submit_feedback(
        &self,
        feedback: NewFeedback,
    ) -> Result<FeedbackOutcome, AppError> {
        self.load_job(feedback.jd_id).await?;
        let applied = self.store.apply_feedback(&feedback).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Candidate {} not found for job {}",
                feedback.candidate_id, feedback.jd_id
            ))
        })?;

        info!(
            "Feedback '{}' on candidate {} (now {}): weight {:.4} -> {:.4}",
            applied.event.action,
            feedback.candidate_id,
            applied.candidate.status,
            applied.event.weight_before,
            applied.event.weight_after
        );

        let summary = self
            .compute_match(feedback.candidate_id, feedback.jd_id)
            .await?;
        Ok(FeedbackOutcome {
            event: applied.event,
            summary,
        })
    }
}
