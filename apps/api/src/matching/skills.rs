//! Skill set comparison between a candidate and a job's requirement lists.
//!
//! Matching is case-insensitive exact equality. No substring or fuzzy matching
//! happens here; normalising spellings is the extraction layer's concern.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Result of comparing one candidate's skills against a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillComparison {
    /// Candidate skills equal to some required skill, in candidate order.
    pub matched_required: Vec<String>,
    /// Candidate skills equal to some good-to-have skill, in candidate order.
    pub matched_good_to_have: Vec<String>,
    /// Required skills the candidate lacks, in requirement order.
    pub missing_required: Vec<String>,
    /// Candidate skills matching either list, each once, in candidate order.
    pub matched_skills: Vec<String>,
}

fn lowered(skills: &[String]) -> HashSet<String> {
    skills.iter().map(|s| s.trim().to_lowercase()).collect()
}

/// Collapses case-insensitive duplicates, keeping the first spelling.
fn dedup_case_insensitive(skills: &[String]) -> Vec<&String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .filter(|s| !s.trim().is_empty() && seen.insert(s.trim().to_lowercase()))
        .collect()
}

pub fn compare_skills(
    candidate_skills: &[String],
    required_skills: &[String],
    good_to_have: &[String],
) -> SkillComparison {
    let required = lowered(required_skills);
    let optional = lowered(good_to_have);
    let candidate = lowered(candidate_skills);

    let mut comparison = SkillComparison::default();

    for skill in dedup_case_insensitive(candidate_skills) {
        let key = skill.trim().to_lowercase();
        let in_required = required.contains(&key);
        let in_optional = optional.contains(&key);

        if in_required {
            comparison.matched_required.push(skill.clone());
        }
        if in_optional {
            comparison.matched_good_to_have.push(skill.clone());
        }
        if in_required || in_optional {
            comparison.matched_skills.push(skill.clone());
        }
    }

    comparison.missing_required = dedup_case_insensitive(required_skills)
        .into_iter()
        .filter(|req| !candidate.contains(&req.trim().to_lowercase()))
        .cloned()
        .collect();

    comparison
}
