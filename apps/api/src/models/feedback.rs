use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::feedback::FeedbackAction;

/// Append-only record of a recruiter action and the weight change it caused.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub jd_id: Uuid,
    pub candidate_id: Uuid,
    pub action: String,
    pub notes: Option<String>,
    pub weight_before: f64,
    pub weight_after: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for the store's atomic apply-feedback transaction.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub jd_id: Uuid,
    pub candidate_id: Uuid,
    pub action: FeedbackAction,
    pub notes: Option<String>,
}
