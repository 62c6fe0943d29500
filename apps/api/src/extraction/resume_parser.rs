//! Resume text extraction: contact fields, skills and years of experience.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::lexicon::SkillLexicon;
use crate::extraction::ExtractionError;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.\w+").ok());
static PHONE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").ok()
});
static EXPERIENCE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\+?\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)\b").ok()
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
}

pub fn extract_candidate_info(resume_text: &str, lexicon: &SkillLexicon) -> CandidateInfo {
    let find = |re: &LazyLock<Option<Regex>>| {
        re.as_ref()
            .and_then(|re| re.find(resume_text))
            .map(|m| m.as_str().trim().to_string())
    };

    let experience_years = EXPERIENCE_RE
        .as_ref()
        .and_then(|re| re.captures(resume_text))
        .and_then(|caps| caps.get(1)?.as_str().parse::<f64>().ok());

    CandidateInfo {
        // First non-blank line is usually the name.
        name: resume_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string),
        email: find(&EMAIL_RE),
        phone: find(&PHONE_RE),
        skills: lexicon.find_skills(resume_text),
        experience_years,
    }
}

pub fn generate_candidate_summary(name: &str, experience_years: Option<f64>, skills: &[String]) -> String {
    let years = match experience_years {
        Some(y) if y > 0.0 && y.fract() == 0.0 => format!("{y:.0}"),
        Some(y) if y > 0.0 => format!("{y}"),
        _ => "relevant".to_string(),
    };
    let top_skills = skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    format!(
        "{name} is a professional with {years} years of experience specializing in {top_skills}. Strong technical background with proven expertise in modern development practices."
    )
}

/// Extracts plain text from an uploaded resume file.
pub fn extract_resume_text(content_type: &str, data: &[u8]) -> Result<String, ExtractionError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let text = match mime.as_str() {
        "application/pdf" => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))?
        }
        "text/plain" | "text/markdown" => String::from_utf8_lossy(data).into_owned(),
        other => return Err(ExtractionError::UnsupportedFileType(other.to_string())),
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = r#"

        Jane Doe
        jane.doe@example.com | +1 415-555-0134
        Frontend engineer with 6+ years of experience building React and TypeScript apps.
        Comfortable with CSS, Redux and Node.js.
    "#;

    #[test]
    fn test_extracts_contact_fields_and_skills() {
        let info = extract_candidate_info(RESUME, &SkillLexicon::builtin());
        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(info.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(info.phone.as_deref(), Some("+1 415-555-0134"));
        assert_eq!(info.experience_years, Some(6.0));
        assert_eq!(
            info.skills,
            vec!["React", "Node.js", "TypeScript", "CSS", "Redux"]
        );
    }

    #[test]
    fn test_missing_fields_are_none() {
        let info = extract_candidate_info("   \n\n", &SkillLexicon::builtin());
        assert_eq!(info, CandidateInfo::default());
    }

    #[test]
    fn test_summary_template() {
        let skills: Vec<String> = ["Rust", "Go", "SQL", "AWS"].iter().map(|s| s.to_string()).collect();
        let summary = generate_candidate_summary("Sam", Some(4.0), &skills);
        assert!(summary.starts_with("Sam is a professional with 4 years of experience specializing in Rust, Go, SQL."));

        let summary = generate_candidate_summary("Sam", None, &skills);
        assert!(summary.contains("relevant years"));
    }

    #[test]
    fn test_plain_text_passthrough_and_rejections() {
        let text = extract_resume_text("text/plain; charset=utf-8", b"Jane Doe\nRust").unwrap();
        assert!(text.contains("Rust"));

        assert!(matches!(
            extract_resume_text("application/msword", b"..."),
            Err(ExtractionError::UnsupportedFileType(_))
        ));
        assert!(matches!(
            extract_resume_text("text/plain", b"   "),
            Err(ExtractionError::EmptyDocument)
        ));
    }
}
