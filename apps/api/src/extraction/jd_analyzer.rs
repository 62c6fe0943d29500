//! JD analyzer: reduces a raw job description to role, skill lists and an experience band.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::lexicon::SkillLexicon;

/// Share of found skills (rounded up) treated as required; the rest are good-to-have.
const REQUIRED_SHARE: f64 = 0.7;
const DEFAULT_ROLE: &str = "Software Developer";
const DEFAULT_EXPERIENCE_LEVEL: &str = "2-4 years";

static RANGE_YEARS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*-\s*\d+\s*(?:years?|yrs?)\b").ok());
static SINGLE_YEARS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\+?\s*(?:years?|yrs?)\b").ok());
static SENIOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:senior|lead|principal)\b").ok());
static MID_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:mid-level|intermediate)\b").ok());
static JUNIOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:junior|entry)\b").ok());

static HIRING_ROLE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:hiring|looking for|seeking)\s+(?:an?\s+)?((?:[a-z]+\s+){0,3}?(?:developer|engineer|architect|designer|manager|analyst))\b",
    )
    .ok()
});
static QUALIFIED_ROLE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:frontend|backend|full\s*stack|fullstack|devops|data|mobile|software|web)\s+(?:developer|engineer))\b",
    )
    .ok()
});
static BARE_ROLE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(developer|engineer|architect|designer|manager|analyst)\b").ok()
});

/// Structured output of JD analysis, ready to be stored as a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub role: String,
    pub required_skills: Vec<String>,
    pub good_to_have: Vec<String>,
    pub experience_level: String,
    pub summary: String,
    pub lexicon_version: String,
}

pub fn analyze_job_description(jd_text: &str, lexicon: &SkillLexicon) -> JobAnalysis {
    let skills = lexicon.find_skills(jd_text);
    let role = extract_role(jd_text);
    let summary = summarize(&role, &skills);
    let (required_skills, good_to_have) = split_requirements(skills);

    JobAnalysis {
        role,
        required_skills,
        good_to_have,
        experience_level: extract_experience_level(jd_text),
        summary,
        lexicon_version: lexicon.version().to_string(),
    }
}

/// First 70% (rounded up) of found skills are required.
pub fn split_requirements(mut skills: Vec<String>) -> (Vec<String>, Vec<String>) {
    let cut = ((skills.len() as f64) * REQUIRED_SHARE).ceil() as usize;
    let good_to_have = skills.split_off(cut.min(skills.len()));
    (skills, good_to_have)
}

fn first_match(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    re.as_ref()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

fn is_match(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

pub fn extract_experience_level(text: &str) -> String {
    if let Some(level) = first_match(&RANGE_YEARS_RE, text).or_else(|| first_match(&SINGLE_YEARS_RE, text)) {
        return level;
    }
    if is_match(&SENIOR_RE, text) {
        return "5+ years".to_string();
    }
    if is_match(&MID_RE, text) {
        return "2-5 years".to_string();
    }
    if is_match(&JUNIOR_RE, text) {
        return "0-2 years".to_string();
    }
    DEFAULT_EXPERIENCE_LEVEL.to_string()
}

pub fn extract_role(text: &str) -> String {
    let captured = [&HIRING_ROLE_RE, &QUALIFIED_ROLE_RE, &BARE_ROLE_RE]
        .into_iter()
        .find_map(|re| {
            re.as_ref()
                .and_then(|re| re.captures(text))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        });

    match captured {
        Some(role) => title_case(&role),
        None => DEFAULT_ROLE.to_string(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn summarize(role: &str, skills: &[String]) -> String {
    let top_skills = skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    format!(
        "Seeking a skilled {role} with expertise in {top_skills}. The ideal candidate will contribute to building scalable solutions and collaborate with cross-functional teams."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JD: &str = r#"
        We are hiring a senior backend engineer to own our payments platform.
        Requirements: 3-6 years of experience with Python, Django and PostgreSQL.
        You will deploy on AWS with Docker and Kubernetes. GraphQL is a plus.
    "#;

    const VAGUE_JD: &str = "Join our team! Mid-level folks welcome. We value curiosity.";

    #[test]
    fn test_backend_jd_full_analysis() {
        let lexicon = SkillLexicon::builtin();
        let analysis = analyze_job_description(BACKEND_JD, &lexicon);

        assert_eq!(analysis.role, "Senior Backend Engineer");
        assert_eq!(analysis.experience_level, "3-6 years");
        assert_eq!(analysis.lexicon_version, lexicon.version());
        // 7 skills found -> ceil(4.9) = 5 required, 2 optional
        assert_eq!(
            analysis.required_skills,
            vec!["Python", "PostgreSQL", "AWS", "Docker", "Kubernetes"]
        );
        assert_eq!(analysis.good_to_have, vec!["Django", "GraphQL"]);
        assert!(analysis.summary.contains("Senior Backend Engineer"));
        assert!(analysis.summary.contains("Python, PostgreSQL, AWS"));
    }

    #[test]
    fn test_split_requirements_rounds_up() {
        let skills: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let (required, optional) = split_requirements(skills);
        assert_eq!(required.len(), 3); // ceil(2.1)
        assert!(optional.is_empty());

        let (required, optional) = split_requirements(vec![]);
        assert!(required.is_empty() && optional.is_empty());
    }

    #[test]
    fn test_experience_level_fallbacks() {
        assert_eq!(extract_experience_level("Needs 5+ years in Go"), "5+ years");
        assert_eq!(extract_experience_level("Principal engineer"), "5+ years");
        assert_eq!(extract_experience_level(VAGUE_JD), "2-5 years");
        assert_eq!(extract_experience_level("Entry role"), "0-2 years");
        assert_eq!(extract_experience_level("Great perks"), "2-4 years");
    }

    #[test]
    fn test_role_fallbacks() {
        assert_eq!(extract_role("Looking for a Data Analyst"), "Data Analyst");
        assert_eq!(extract_role("Open position: full stack developer"), "Full Stack Developer");
        assert_eq!(extract_role("The architect owns the design"), "Architect");
        assert_eq!(extract_role("Join us"), "Software Developer");
    }
}
