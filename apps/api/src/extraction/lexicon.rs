//! Versioned skill lexicon used to spot known skills in free text.
//!
//! Injected through `AppState`; the matching engine never reads it.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const BUILTIN_VERSION: &str = "builtin-1";

const BUILTIN_SKILLS: &[&str] = &[
    "JavaScript", "Python", "Java", "React", "Node.js", "Angular", "Vue",
    "TypeScript", "MongoDB", "SQL", "PostgreSQL", "MySQL", "AWS", "Azure",
    "Docker", "Kubernetes", "Git", "HTML", "CSS", "Redux", "Express",
    "Django", "Flask", "Spring", "C++", "C#", ".NET", "PHP", "Ruby",
    "Machine Learning", "AI", "Data Science", "DevOps", "TensorFlow", "PyTorch",
    "Scikit-learn", "REST API", "GraphQL", "Microservices", "Agile", "Scrum",
    "CI/CD", "Jenkins", "Linux", "Windows", "MacOS", "Android", "iOS", "Swift",
    "Kotlin", "Flutter", "React Native", "Tailwind", "Bootstrap", "Sass",
];

/// On-disk shape of a lexicon file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconFile {
    pub version: String,
    pub skills: Vec<String>,
}

struct LexiconEntry {
    skill: String,
    pattern: Regex,
}

pub struct SkillLexicon {
    version: String,
    entries: Vec<LexiconEntry>,
}

impl SkillLexicon {
    pub fn new(version: impl Into<String>, skills: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let entries = skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .filter_map(|skill| {
                // A skill counts only when not glued to other word characters,
                // so "Java" does not fire inside "JavaScript".
                let pattern = format!(
                    r"(?i)(?:^|[^\p{{L}}\p{{N}}+#.])({})(?:$|[^\p{{L}}\p{{N}}+#])",
                    regex::escape(&skill)
                );
                Regex::new(&pattern)
                    .ok()
                    .map(|pattern| LexiconEntry { skill, pattern })
            })
            .collect();

        Self {
            version: version.into(),
            entries,
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_VERSION,
            BUILTIN_SKILLS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill lexicon {}", path.display()))?;
        let file: LexiconFile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid skill lexicon JSON in {}", path.display()))?;
        Ok(Self::new(file.version, file.skills))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Lexicon skills present in `text`, in lexicon order, canonical spelling.
    pub fn find_skills(&self, text: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.pattern.is_match(text))
            .map(|entry| entry.skill.clone())
            .collect()
    }
}
