use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored job description with its reduced skill requirements.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub role: String,
    pub required_skills: Vec<String>,
    pub good_to_have: Vec<String>,
    /// Free text such as "2-5 years"; parsed into a band at scoring time.
    pub experience_level: Option<String>,
    pub summary: Option<String>,
    pub raw_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
