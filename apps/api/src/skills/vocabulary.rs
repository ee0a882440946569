use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Cannot read taxonomy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid taxonomy JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid taxonomy: {0}")]
    Invalid(String),
}

/// Ordered, de-duplicated set of canonical skill labels.
/// Declaration order is the order matched skills are reported in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    labels: Vec<String>,
}

impl SkillVocabulary {
    /// Keeps the first spelling of labels that differ only by case.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into().trim().to_string();
            if !label.is_empty() && !out.iter().any(|l| l.eq_ignore_ascii_case(&label)) {
                out.push(label);
            }
        }
        Self { labels: out }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

/// One row of the position table: a label and the skills that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRule {
    pub label: String,
    pub skills: Vec<String>,
}

impl PositionRule {
    pub fn new(label: &str, skills: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Skill vocabulary plus the priority-ordered position rules.
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub vocabulary: SkillVocabulary,
    pub rules: Vec<PositionRule>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    skills: Vec<String>,
    #[serde(default)]
    positions: Vec<PositionRule>,
}

impl Taxonomy {
    pub fn new(vocabulary: SkillVocabulary, rules: Vec<PositionRule>) -> Result<Self, TaxonomyError> {
        if vocabulary.is_empty() {
            return Err(TaxonomyError::Invalid("skill vocabulary is empty".to_string()));
        }
        for rule in &rules {
            if rule.label.trim().is_empty() {
                return Err(TaxonomyError::Invalid("position rule with blank label".to_string()));
            }
            if rule.skills.is_empty() {
                return Err(TaxonomyError::Invalid(format!(
                    "position '{}' lists no skills",
                    rule.label
                )));
            }
            if let Some(unknown) = rule.skills.iter().find(|s| !vocabulary.contains(s)) {
                return Err(TaxonomyError::Invalid(format!(
                    "position '{}' references unknown skill '{}'",
                    rule.label, unknown
                )));
            }
        }
        Ok(Self { vocabulary, rules })
    }

    pub fn from_json(json: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile = serde_json::from_str(json)?;
        Self::new(SkillVocabulary::new(file.skills), file.positions)
    }

    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for Taxonomy {
    /// Built-in taxonomy. The first five skills are the tracker's original keyword list.
    /// Rule order is priority order: more specific roles come first.
    /// Labels that are substrings of common words ("Excel", "Rust", "Go") are left out.
    fn default() -> Self {
        let vocabulary = SkillVocabulary::new([
            "Python",
            "Java",
            "SQL",
            "Machine Learning",
            "Data Science",
            "Deep Learning",
            "TensorFlow",
            "PyTorch",
            "NLP",
            "JavaScript",
            "TypeScript",
            "React",
            "Angular",
            "HTML",
            "CSS",
            "Node.js",
            "C++",
            "C#",
            "Golang",
            "Docker",
            "Kubernetes",
            "Terraform",
            "Linux",
            "Pandas",
            "Tableau",
            "Power BI",
            "Figma",
        ]);
        let rules = vec![
            PositionRule::new(
                "Data Scientist",
                &["Machine Learning", "Data Science", "Deep Learning", "TensorFlow", "PyTorch", "NLP"],
            ),
            PositionRule::new(
                "Frontend Developer",
                &["JavaScript", "TypeScript", "React", "Angular", "HTML", "CSS"],
            ),
            PositionRule::new("DevOps Engineer", &["Docker", "Kubernetes", "Terraform", "Linux"]),
            PositionRule::new(
                "Software Engineer",
                &["Python", "Java", "SQL", "Node.js", "C++", "C#", "Golang"],
            ),
            PositionRule::new("Data Analyst", &["Pandas", "Tableau", "Power BI"]),
            PositionRule::new("UI/UX Designer", &["Figma"]),
        ];
        Self { vocabulary, rules }
    }
}
