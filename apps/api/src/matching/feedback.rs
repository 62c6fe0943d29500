//! Recruiter feedback actions and the multiplicative weight they apply.
//!
//! A candidate's weight is the running product of every multiplier applied to
//! it. There is no floor or ceiling; only the final blended score is capped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    Viewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl FeedbackAction {
    pub fn multiplier(&self) -> f64 {
        match self {
            FeedbackAction::Viewed => 1.02,
            FeedbackAction::Shortlisted => 1.15,
            FeedbackAction::Rejected => 0.90,
            FeedbackAction::Hired => 1.40,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackAction::Viewed => "viewed",
            FeedbackAction::Shortlisted => "shortlisted",
            FeedbackAction::Rejected => "rejected",
            FeedbackAction::Hired => "hired",
        }
    }
}

impl fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewed" => Ok(FeedbackAction::Viewed),
            "shortlisted" => Ok(FeedbackAction::Shortlisted),
            "rejected" => Ok(FeedbackAction::Rejected),
            "hired" => Ok(FeedbackAction::Hired),
            other => Err(format!("unknown feedback action '{other}'")),
        }
    }
}

/// New weight after one feedback event. Apply exactly once per event.
pub fn adapt_weight(current_weight: f64, action: FeedbackAction) -> f64 {
    current_weight * action.multiplier()
}

/// Multiplier for free-text actions; unrecognised text is a no-op (1.0).
pub fn multiplier_for(action: &str) -> f64 {
    action
        .parse::<FeedbackAction>()
        .map(|a| a.multiplier())
        .unwrap_or(1.0)
}

/// Weight adaptation for free-text actions from older clients or imports.
pub fn adapt_weight_str(current_weight: f64, action: &str) -> f64 {
    current_weight * multiplier_for(action)
}
