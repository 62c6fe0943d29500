use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::feedback::FeedbackAction;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub jd_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub raw_resume_text: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
    pub match_score: i32,
    /// True when the last computation fell back to the neutral score.
    pub score_degraded: bool,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub status: String,
    pub feedback_weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to register a candidate against a job.
/// Score fields are not accepted here; they start at their defaults.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub jd_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub raw_resume_text: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
}

/// Score and skill fields written back by the match orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchUpdate {
    pub match_score: i32,
    pub score_degraded: bool,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    None,
    Viewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::None => "none",
            CandidateStatus::Viewed => "viewed",
            CandidateStatus::Shortlisted => "shortlisted",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Hired => "hired",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CandidateStatus::None),
            "viewed" => Ok(CandidateStatus::Viewed),
            "shortlisted" => Ok(CandidateStatus::Shortlisted),
            "rejected" => Ok(CandidateStatus::Rejected),
            "hired" => Ok(CandidateStatus::Hired),
            other => Err(format!("unknown candidate status '{other}'")),
        }
    }
}

impl From<FeedbackAction> for CandidateStatus {
    fn from(action: FeedbackAction) -> Self {
        match action {
            FeedbackAction::Viewed => CandidateStatus::Viewed,
            FeedbackAction::Shortlisted => CandidateStatus::Shortlisted,
            FeedbackAction::Rejected => CandidateStatus::Rejected,
            FeedbackAction::Hired => CandidateStatus::Hired,
        }
    }
}
