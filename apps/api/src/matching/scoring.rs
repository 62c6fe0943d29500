//! Raw match score: skill overlap plus experience fit, on a 0–100 scale.
//!
//! Weights are fixed: required skills 70, good-to-have 10, experience 20.
//! Malformed input never blocks ranking; it yields a degraded neutral score.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::matching::skills::compare_skills;

pub const REQUIRED_SKILLS_WEIGHT: f64 = 70.0;
pub const GOOD_TO_HAVE_WEIGHT: f64 = 10.0;
pub const EXPERIENCE_FIT_POINTS: f64 = 20.0;
/// Over-qualified candidates get less than an exact fit.
pub const EXPERIENCE_OVER_POINTS: f64 = 15.0;
/// Scale for linear partial credit below the band minimum.
pub const EXPERIENCE_UNDER_SCALE: f64 = 10.0;
pub const NEUTRAL_SCORE: u32 = 50;
pub const MAX_SCORE: u32 = 100;

static RANGE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)").ok());
static SINGLE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").ok());

/// Why a calculation fell back to the neutral score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationFallback {
    #[error("experience years must be finite and non-negative, got {0}")]
    InvalidExperienceYears(f64),

    #[error("job has no experience band")]
    MissingExperienceBand,

    #[error("experience band '{text}' has min {min} above max {max}")]
    InvertedExperienceBand { text: String, min: f64, max: f64 },
}

/// Inclusive range of years a job asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceBand {
    pub min: f64,
    pub max: f64,
}

impl ExperienceBand {
    pub const DEFAULT: ExperienceBand = ExperienceBand { min: 2.0, max: 4.0 };

    /// "2-5 years" → (2, 5); "3+ years" → (3, 5); anything else → (2, 4).
    pub fn parse(text: &str) -> Self {
        let capture_pair = RANGE_RE
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| {
                let min = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let max = caps.get(2)?.as_str().parse::<f64>().ok()?;
                Some(ExperienceBand { min, max })
            });
        if let Some(band) = capture_pair {
            return band;
        }

        SINGLE_RE
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .map(|years| ExperienceBand {
                min: years,
                max: years + 2.0,
            })
            .unwrap_or(Self::DEFAULT)
    }

    pub fn contains(&self, years: f64) -> bool {
        years >= self.min && years <= self.max
    }
}

/// Borrowed inputs for one raw score computation.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub candidate_skills: &'a [String],
    pub required_skills: &'a [String],
    pub good_to_have: &'a [String],
    /// Absent counts as zero years.
    pub experience_years: Option<f64>,
    pub experience_band: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub required: f64,
    pub good_to_have: f64,
    pub experience: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.required + self.good_to_have + self.experience
    }
}

/// A raw score, plus the reason when it is a fallback rather than a computed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: u32,
    pub breakdown: Option<ScoreBreakdown>,
    pub fallback: Option<CalculationFallback>,
}

impl ScoreOutcome {
    fn computed(breakdown: ScoreBreakdown) -> Self {
        let score = (breakdown.total().round().max(0.0) as u32).min(MAX_SCORE);
        Self {
            score,
            breakdown: Some(breakdown),
            fallback: None,
        }
    }

    fn degraded(reason: CalculationFallback) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            breakdown: None,
            fallback: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Computes the raw score. Never fails: malformed input yields `NEUTRAL_SCORE`
/// with `fallback` set.
pub fn calculate_raw_score(input: &ScoreInput<'_>) -> ScoreOutcome {
    match score_breakdown(input) {
        Ok(breakdown) => ScoreOutcome::computed(breakdown),
        Err(reason) => {
            warn!("Score calculation fell back to {NEUTRAL_SCORE}: {reason}");
            ScoreOutcome::degraded(reason)
        }
    }
}

fn score_breakdown(input: &ScoreInput<'_>) -> Result<ScoreBreakdown, CalculationFallback> {
    let years = input.experience_years.unwrap_or(0.0);
    if !years.is_finite() || years < 0.0 {
        return Err(CalculationFallback::InvalidExperienceYears(years));
    }

    let band_text = input
        .experience_band
        .ok_or(CalculationFallback::MissingExperienceBand)?;
    let band = ExperienceBand::parse(band_text);
    if band.min > band.max {
        return Err(CalculationFallback::InvertedExperienceBand {
            text: band_text.to_string(),
            min: band.min,
            max: band.max,
        });
    }

    let comparison = compare_skills(
        input.candidate_skills,
        input.required_skills,
        input.good_to_have,
    );

    let required = ratio(comparison.matched_required.len(), input.required_skills.len())
        * REQUIRED_SKILLS_WEIGHT;
    let good_to_have = ratio(comparison.matched_good_to_have.len(), input.good_to_have.len())
        * GOOD_TO_HAVE_WEIGHT;

    Ok(ScoreBreakdown {
        required,
        good_to_have,
        experience: experience_points(years, &band),
    })
}

fn ratio(matched: usize, total: usize) -> f64 {
    (matched as f64 / total.max(1) as f64).min(1.0)
}

/// 20 inside the band, 15 above it, linear partial credit below it.
pub fn experience_points(years: f64, band: &ExperienceBand) -> f64 {
    if band.contains(years) {
        EXPERIENCE_FIT_POINTS
    } else if years > band.max {
        EXPERIENCE_OVER_POINTS
    } else if band.min <= 0.0 || years <= 0.0 {
        0.0
    } else {
        (years / band.min) * EXPERIENCE_UNDER_SCALE
    }
}

/// Scales a raw score by a candidate's feedback weight, capped at 100.
pub fn apply_feedback_weight(raw_score: u32, feedback_weight: f64) -> u32 {
    let weighted = (raw_score as f64 * feedback_weight).round();
    if weighted.is_nan() {
        return 0;
    }
    weighted.clamp(0.0, MAX_SCORE as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn frontend_job() -> (Vec<String>, Vec<String>) {
        (skills(&["React", "TypeScript", "CSS"]), skills(&["Redux"]))
    }

    #[test]
    fn test_full_match_scores_100() {
        let (required, good) = frontend_job();
        let candidate = skills(&["React", "TypeScript", "CSS", "Redux"]);
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &candidate,
            required_skills: &required,
            good_to_have: &good,
            experience_years: Some(4.0),
            experience_band: Some("2-5 years"),
        });

        let breakdown = outcome.breakdown.unwrap();
        assert!((breakdown.required - 70.0).abs() < 1e-9);
        assert!((breakdown.good_to_have - 10.0).abs() < 1e-9);
        assert!((breakdown.experience - 20.0).abs() < 1e-9);
        assert_eq!(outcome.score, 100);
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn test_partial_match_with_under_experience() {
        let (required, good) = frontend_job();
        let candidate = skills(&["React"]);
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &candidate,
            required_skills: &required,
            good_to_have: &good,
            experience_years: Some(1.0),
            experience_band: Some("2-5 years"),
        });

        let breakdown = outcome.breakdown.unwrap();
        assert!((breakdown.required - 70.0 / 3.0).abs() < 1e-9);
        assert_eq!(breakdown.good_to_have, 0.0);
        assert!((breakdown.experience - 5.0).abs() < 1e-9);
        assert_eq!(outcome.score, 28);
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!(
            ExperienceBand::parse("2-5 years"),
            ExperienceBand { min: 2.0, max: 5.0 }
        );
        assert_eq!(
            ExperienceBand::parse("3 - 7 yrs"),
            ExperienceBand { min: 3.0, max: 7.0 }
        );
        assert_eq!(
            ExperienceBand::parse("5+ years"),
            ExperienceBand { min: 5.0, max: 7.0 }
        );
        assert_eq!(ExperienceBand::parse("senior"), ExperienceBand::DEFAULT);
        assert_eq!(ExperienceBand::parse(""), ExperienceBand::DEFAULT);
    }

    #[test]
    fn test_over_qualified_gets_15() {
        let band = ExperienceBand::parse("2-5 years");
        assert_eq!(experience_points(9.0, &band), 15.0);
        assert_eq!(experience_points(5.0, &band), 20.0);
        assert_eq!(experience_points(2.0, &band), 20.0);
    }

    #[test]
    fn test_zero_experience_or_zero_min_gets_no_partial_credit() {
        let band = ExperienceBand { min: 3.0, max: 5.0 };
        assert_eq!(experience_points(0.0, &band), 0.0);

        let (required, good) = frontend_job();
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &[],
            required_skills: &required,
            good_to_have: &good,
            experience_years: None,
            experience_band: Some("3-5 years"),
        });
        assert_eq!(outcome.score, 0);
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn test_empty_requirement_lists_do_not_divide_by_zero() {
        let candidate = skills(&["Rust"]);
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &candidate,
            required_skills: &[],
            good_to_have: &[],
            experience_years: Some(3.0),
            experience_band: Some("2-4 years"),
        });
        assert_eq!(outcome.score, 20);
    }

    #[test]
    fn test_negative_years_fall_back_to_neutral() {
        let (required, good) = frontend_job();
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &required,
            required_skills: &required,
            good_to_have: &good,
            experience_years: Some(-1.0),
            experience_band: Some("2-5 years"),
        });
        assert_eq!(outcome.score, NEUTRAL_SCORE);
        assert_eq!(
            outcome.fallback,
            Some(CalculationFallback::InvalidExperienceYears(-1.0))
        );
    }

    #[test]
    fn test_nan_years_and_missing_band_fall_back() {
        let (required, good) = frontend_job();
        let nan = calculate_raw_score(&ScoreInput {
            candidate_skills: &[],
            required_skills: &required,
            good_to_have: &good,
            experience_years: Some(f64::NAN),
            experience_band: Some("2-5 years"),
        });
        assert!(nan.is_degraded());
        assert_eq!(nan.score, NEUTRAL_SCORE);

        let missing = calculate_raw_score(&ScoreInput {
            candidate_skills: &[],
            required_skills: &required,
            good_to_have: &good,
            experience_years: Some(3.0),
            experience_band: None,
        });
        assert_eq!(missing.fallback, Some(CalculationFallback::MissingExperienceBand));
    }

    #[test]
    fn test_inverted_band_falls_back() {
        let outcome = calculate_raw_score(&ScoreInput {
            candidate_skills: &[],
            required_skills: &[],
            good_to_have: &[],
            experience_years: Some(3.0),
            experience_band: Some("6-2 years"),
        });
        assert!(matches!(
            outcome.fallback,
            Some(CalculationFallback::InvertedExperienceBand { .. })
        ));
    }

    #[test]
    fn test_raw_score_bounded_0_to_100() {
        let (required, good) = frontend_job();
        let pools = [
            skills(&[]),
            skills(&["React"]),
            skills(&["react", "REACT", "React", "css", "Redux", "Go"]),
            skills(&["React", "TypeScript", "CSS", "Redux"]),
        ];
        for candidate in &pools {
            for years in [0.0, 0.5, 1.0, 2.0, 4.0, 12.0, 40.0] {
                for band in ["0-2 years", "2-5 years", "10+ years", "unknown"] {
                    let outcome = calculate_raw_score(&ScoreInput {
                        candidate_skills: candidate,
                        required_skills: &required,
                        good_to_have: &good,
                        experience_years: Some(years),
                        experience_band: Some(band),
                    });
                    assert!(outcome.score <= 100, "score {} out of range", outcome.score);
                }
            }
        }
    }

    #[test]
    fn test_feedback_weight_caps_final_score() {
        assert_eq!(apply_feedback_weight(90, 1.40), 100);
        assert_eq!(apply_feedback_weight(28, 1.0), 28);
        assert_eq!(apply_feedback_weight(50, 0.9), 45);
        assert_eq!(apply_feedback_weight(0, 3.0), 0);
    }
}
