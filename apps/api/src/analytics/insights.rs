//! Dashboard aggregates over the candidate pool. Pure functions; the handlers
//! load the rows.

use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::CandidateStats;
use crate::models::candidate::CandidateStatus;

const TOP_SKILLS_LIMIT: usize = 10;

const DEFAULT_INSIGHTS: [&str; 3] = [
    "Start analyzing more candidates to get personalized insights.",
    "Candidates with matching skills are 3x more likely to be shortlisted.",
    "Experience level plays a key role in final hiring decisions.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_jds: i64,
    pub total_candidates: usize,
    pub total_shortlisted: usize,
    pub total_hired: usize,
    pub average_match_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucket {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub name: String,
    pub count: usize,
}

fn has_status(candidate: &CandidateStats, status: CandidateStatus) -> bool {
    candidate.status == status.as_str()
}

pub fn overview(total_jds: i64, candidates: &[CandidateStats]) -> Overview {
    let average_match_score = if candidates.is_empty() {
        0
    } else {
        let sum: f64 = candidates.iter().map(|c| f64::from(c.match_score)).sum();
        (sum / candidates.len() as f64).round() as u32
    };

    Overview {
        total_jds,
        total_candidates: candidates.len(),
        total_shortlisted: candidates
            .iter()
            .filter(|c| has_status(c, CandidateStatus::Shortlisted))
            .count(),
        total_hired: candidates
            .iter()
            .filter(|c| has_status(c, CandidateStatus::Hired))
            .count(),
        average_match_score,
    }
}

/// Buckets are lower-inclusive; the last one also takes 100.
pub fn match_distribution(candidates: &[CandidateStats]) -> Vec<ScoreBucket> {
    let mut buckets = vec![
        ScoreBucket { range: "0-40", count: 0 },
        ScoreBucket { range: "40-60", count: 0 },
        ScoreBucket { range: "60-80", count: 0 },
        ScoreBucket { range: "80-100", count: 0 },
    ];

    for candidate in candidates {
        let idx = match candidate.match_score {
            s if s < 40 => 0,
            s if s < 60 => 1,
            s if s < 80 => 2,
            _ => 3,
        };
        buckets[idx].count += 1;
    }
    buckets
}

/// Counts skills in first-seen order so ties keep a stable ranking.
fn count_skills<'a>(candidates: impl Iterator<Item = &'a CandidateStats>) -> Vec<SkillCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SkillCount> = Vec::new();

    for candidate in candidates {
        for skill in &candidate.skills {
            match index.get(skill.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(skill.as_str(), counts.len());
                    counts.push(SkillCount {
                        name: skill.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn top_skills(candidates: &[CandidateStats], status: Option<CandidateStatus>) -> Vec<SkillCount> {
    let mut counts = count_skills(
        candidates
            .iter()
            .filter(|c| status.map_or(true, |s| has_status(c, s))),
    );
    counts.truncate(TOP_SKILLS_LIMIT);
    counts
}

pub fn learning_insights(candidates: &[CandidateStats], latest_role: Option<&str>) -> Vec<String> {
    let mut insights = Vec::new();

    let shortlisted: Vec<_> = candidates
        .iter()
        .filter(|c| has_status(c, CandidateStatus::Shortlisted))
        .collect();
    if !shortlisted.is_empty() {
        let total: f64 = shortlisted
            .iter()
            .map(|c| c.experience_years.unwrap_or(0.0))
            .sum();
        let avg = (total / shortlisted.len() as f64).round();
        if avg > 0.0 {
            insights.push(format!(
                "Most shortlisted candidates have around {avg:.0} years of experience."
            ));
        }
    }

    let hired: Vec<_> = candidates
        .iter()
        .filter(|c| has_status(c, CandidateStatus::Hired))
        .collect();
    if let Some(top) = count_skills(hired.iter().copied()).first() {
        let percentage = (top.count as f64 / hired.len() as f64 * 100.0).round();
        insights.push(format!(
            "{} appears in {percentage:.0}% of hired candidates.",
            top.name
        ));
    }

    if let Some(role) = latest_role {
        insights.push(format!(
            "Currently focusing on {role} and related positions."
        ));
    }

    if insights.is_empty() {
        insights.extend(DEFAULT_INSIGHTS.iter().map(|s| s.to_string()));
    }
    insights
}
