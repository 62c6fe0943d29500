use serde::{Deserialize, Serialize};

use crate::matching::orchestrator::MatchSummary;
use crate::models::job::JobRow;

/// Share of required skills a candidate must cover to count as strongly aligned.
const STRONG_ALIGNMENT_RATIO: f64 = 0.7;
const SOLID_EXPERIENCE_YEARS: f64 = 3.0;
const LIMITED_EXPERIENCE_YEARS: f64 = 2.0;
const MISSING_SKILLS_TOLERANCE: usize = 2;
const TARGET_MATCH_THRESHOLD: u32 = 60;

/// Human-readable rationale for a candidate's match. No list is ever empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchExplanation {
    pub explanation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub risk_factors: Vec<String>,
}

pub fn explain_match(summary: &MatchSummary, job: &JobRow) -> MatchExplanation {
    let years = summary.experience_years.unwrap_or(0.0);
    let required_count = job.required_skills.len();

    let mut strengths = Vec::new();
    if summary.matched_skills.len() as f64 > required_count as f64 * STRONG_ALIGNMENT_RATIO {
        strengths.push("Strong skill alignment with job requirements".to_string());
    }
    if years >= SOLID_EXPERIENCE_YEARS {
        strengths.push("Solid professional experience".to_string());
    }

    let mut weaknesses = Vec::new();
    if summary.missing_skills.len() > MISSING_SKILLS_TOLERANCE {
        weaknesses.push("Missing some key technical skills".to_string());
    }
    if years < LIMITED_EXPERIENCE_YEARS {
        weaknesses.push("Limited professional experience".to_string());
    }

    let mut risk_factors = Vec::new();
    if summary.match_score < TARGET_MATCH_THRESHOLD {
        risk_factors.push("Below target match threshold".to_string());
    }
    if summary.degraded {
        risk_factors
            .push("Match score is a fallback estimate from incomplete profile data".to_string());
    }

    let explanation = format!(
        "This candidate matches {}% of the requirements. {} out of {} required skills are present.",
        summary.match_score,
        summary.matched_skills.len(),
        required_count
    );

    MatchExplanation {
        explanation,
        strengths: or_placeholder(strengths, "Basic qualifications met"),
        weaknesses: or_placeholder(weaknesses, "No significant concerns"),
        risk_factors: or_placeholder(risk_factors, "Low risk candidate"),
    }
}

fn or_placeholder(items: Vec<String>, placeholder: &str) -> Vec<String> {
    if items.is_empty() {
        vec![placeholder.to_string()]
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::memory::fixtures::{frontend_job, skills};
    use uuid::Uuid;

    fn summary(score: u32, matched: &[&str], missing: &[&str], years: Option<f64>) -> MatchSummary {
        MatchSummary {
            candidate_id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            match_score: score,
            degraded: false,
            matched_skills: skills(matched),
            missing_skills: skills(missing),
            summary: None,
            status: "none".to_string(),
            experience_years: years,
            feedback_weight: 1.0,
        }
    }

    #[test]
    fn test_strong_candidate() {
        let job = frontend_job();
        let result = explain_match(
            &summary(100, &["React", "TypeScript", "CSS", "Redux"], &[], Some(4.0)),
            &job,
        );
        assert_eq!(
            result.strengths,
            vec![
                "Strong skill alignment with job requirements".to_string(),
                "Solid professional experience".to_string()
            ]
        );
        assert_eq!(result.weaknesses, vec!["No significant concerns".to_string()]);
        assert_eq!(result.risk_factors, vec!["Low risk candidate".to_string()]);
        assert_eq!(
            result.explanation,
            "This candidate matches 100% of the requirements. 4 out of 3 required skills are present."
        );
    }

    #[test]
    fn test_weak_candidate() {
        let mut job = frontend_job();
        job.required_skills = skills(&["React", "TypeScript", "CSS", "GraphQL"]);
        let result = explain_match(
            &summary(28, &["React"], &["TypeScript", "CSS", "GraphQL"], Some(1.0)),
            &job,
        );
        assert_eq!(result.strengths, vec!["Basic qualifications met".to_string()]);
        assert_eq!(
            result.weaknesses,
            vec![
                "Missing some key technical skills".to_string(),
                "Limited professional experience".to_string()
            ]
        );
        assert_eq!(result.risk_factors, vec!["Below target match threshold".to_string()]);
    }

    #[test]
    fn test_alignment_ratio_is_strict() {
        // 0.7 * 10 = 7 matched is not strictly greater
        let mut job = frontend_job();
        job.required_skills = (0..10).map(|i| format!("skill-{i}")).collect();
        let matched: Vec<String> = (0..7).map(|i| format!("skill-{i}")).collect();
        let mut s = summary(70, &[], &[], Some(2.5));
        s.matched_skills = matched;
        let result = explain_match(&s, &job);
        assert_eq!(result.strengths, vec!["Basic qualifications met".to_string()]);
    }

    #[test]
    fn test_absent_experience_counts_as_limited() {
        let job = frontend_job();
        let result = explain_match(&summary(75, &["React", "CSS", "TypeScript"], &[], None), &job);
        assert!(result
            .weaknesses
            .contains(&"Limited professional experience".to_string()));
    }

    #[test]
    fn test_degraded_score_is_flagged_as_risk() {
        let job = frontend_job();
        let mut s = summary(50, &[], &[], Some(3.0));
        s.degraded = true;
        let result = explain_match(&s, &job);
        assert_eq!(result.risk_factors.len(), 2);
        assert!(result.risk_factors[1].contains("fallback"));
    }

    #[test]
    fn test_thresholds_at_their_edges() {
        let job = frontend_job();

        // Score of exactly 60 is on target; two missing skills are tolerated;
        // two years is not limited.
        let result = explain_match(
            &summary(60, &["React"], &["TypeScript", "CSS"], Some(2.0)),
            &job,
        );
        assert_eq!(result.strengths, vec!["Basic qualifications met".to_string()]);
        assert_eq!(result.weaknesses, vec!["No significant concerns".to_string()]);
        assert_eq!(result.risk_factors, vec!["Low risk candidate".to_string()]);

        // Three years is solid; 59 is below target.
        let result = explain_match(&summary(59, &["React"], &["CSS"], Some(3.0)), &job);
        assert_eq!(result.strengths, vec!["Solid professional experience".to_string()]);
        assert_eq!(result.risk_factors, vec!["Below target match threshold".to_string()]);

        // Just under each experience edge.
        let result = explain_match(&summary(80, &["React"], &[], Some(1.9)), &job);
        assert_eq!(result.strengths, vec!["Basic qualifications met".to_string()]);
        assert_eq!(result.weaknesses, vec!["Limited professional experience".to_string()]);
    }
}
