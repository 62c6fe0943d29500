//! In-memory `MatchStore` used by unit and router tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::feedback::adapt_weight;
use crate::matching::store::{AppliedFeedback, MatchStore};
use crate::models::candidate::{CandidateRow, CandidateStatus, MatchUpdate, NewCandidate};
use crate::models::feedback::{FeedbackRow, NewFeedback};
use crate::models::job::JobRow;

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, JobRow>,
    candidates: Vec<CandidateRow>,
    feedback: Vec<FeedbackRow>,
    failing_saves: HashSet<Uuid>,
    save_count: usize,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&self, job: JobRow) {
        self.tables.lock().unwrap().jobs.insert(job.id, job);
    }

    pub fn add_candidate(&self, candidate: CandidateRow) {
        self.tables.lock().unwrap().candidates.push(candidate);
    }

    /// Makes every later `save_match` for this candidate fail.
    pub fn fail_saves_for(&self, candidate_id: Uuid) {
        self.tables.lock().unwrap().failing_saves.insert(candidate_id);
    }

    pub fn candidate(&self, candidate_id: Uuid) -> Option<CandidateRow> {
        self.tables
            .lock()
            .unwrap()
            .candidates
            .iter()
            .find(|c| c.id == candidate_id)
            .cloned()
    }

    pub fn feedback_events(&self) -> Vec<FeedbackRow> {
        self.tables.lock().unwrap().feedback.clone()
    }

    pub fn save_count(&self) -> usize {
        self.tables.lock().unwrap().save_count
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(self.tables.lock().unwrap().jobs.get(&job_id).cloned())
    }

    async fn get_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        Ok(self.candidate(candidate_id))
    }

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<CandidateRow>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .candidates
            .iter()
            .filter(|c| c.jd_id == job_id)
            .cloned()
            .collect())
    }

    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, AppError> {
        let now = Utc::now();
        let row = CandidateRow {
            id: Uuid::new_v4(),
            jd_id: candidate.jd_id,
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            summary: candidate.summary,
            raw_resume_text: candidate.raw_resume_text,
            skills: candidate.skills,
            experience_years: candidate.experience_years,
            match_score: 0,
            score_degraded: false,
            matched_skills: vec![],
            missing_skills: vec![],
            status: CandidateStatus::None.as_str().to_string(),
            feedback_weight: 1.0,
            created_at: now,
            updated_at: now,
        };
        self.add_candidate(row.clone());
        Ok(row)
    }

    async fn save_match(
        &self,
        candidate_id: Uuid,
        scored_weight: f64,
        update: &MatchUpdate,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.failing_saves.contains(&candidate_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "write rejected for candidate {candidate_id}"
            )));
        }
        let candidate = tables
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        if candidate.feedback_weight != scored_weight {
            return Ok(false);
        }
        candidate.match_score = update.match_score;
        candidate.score_degraded = update.score_degraded;
        candidate.matched_skills = update.matched_skills.clone();
        candidate.missing_skills = update.missing_skills.clone();
        candidate.updated_at = Utc::now();
        tables.save_count += 1;
        Ok(true)
    }

    async fn apply_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> Result<Option<AppliedFeedback>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(candidate) = tables
            .candidates
            .iter_mut()
            .find(|c| c.id == feedback.candidate_id && c.jd_id == feedback.jd_id)
        else {
            return Ok(None);
        };

        let weight_before = candidate.feedback_weight;
        let weight_after = adapt_weight(weight_before, feedback.action);
        candidate.feedback_weight = weight_after;
        candidate.status = CandidateStatus::from(feedback.action).as_str().to_string();
        candidate.updated_at = Utc::now();
        let candidate = candidate.clone();

        let event = FeedbackRow {
            id: Uuid::new_v4(),
            jd_id: feedback.jd_id,
            candidate_id: feedback.candidate_id,
            action: feedback.action.as_str().to_string(),
            notes: feedback.notes.clone(),
            weight_before,
            weight_after,
            created_at: Utc::now(),
        };
        tables.feedback.push(event.clone());

        Ok(Some(AppliedFeedback { event, candidate }))
    }
}

pub mod fixtures {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::candidate::CandidateRow;
    use crate::models::job::JobRow;

    pub fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Frontend job: React/TypeScript/CSS required, Redux optional, 2-5 years.
    pub fn frontend_job() -> JobRow {
        let now = Utc::now();
        JobRow {
            id: Uuid::new_v4(),
            role: "Frontend Developer".to_string(),
            required_skills: skills(&["React", "TypeScript", "CSS"]),
            good_to_have: skills(&["Redux"]),
            experience_level: Some("2-5 years".to_string()),
            summary: None,
            raw_text: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn candidate(jd_id: Uuid, name: &str, skill_list: &[&str], years: Option<f64>) -> CandidateRow {
        let now = Utc::now();
        CandidateRow {
            id: Uuid::new_v4(),
            jd_id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            summary: None,
            raw_resume_text: None,
            skills: skills(skill_list),
            experience_years: years,
            match_score: 0,
            score_degraded: false,
            matched_skills: vec![],
            missing_skills: vec![],
            status: "none".to_string(),
            feedback_weight: 1.0,
            created_at: now,
            updated_at: now,
        }
    }
}
