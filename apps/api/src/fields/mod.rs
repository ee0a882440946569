//! Field extraction: normalized resume text in, one `CandidateRecord` out.
//!
//! Each field is independent. A field that cannot be found is left empty and
//! never fails the record.

pub mod name;
pub mod patterns;

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::models::candidate::CandidateRecord;
use crate::models::document::ExtractedText;
use crate::skills::SkillClassifier;

pub use name::{EntityName, FirstLineName, NameStrategy};

/// How many matches a multi-valued field keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    First,
    All,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(MatchMode::First),
            "all" => Ok(MatchMode::All),
            other => Err(format!("unknown match mode '{other}' (expected first|all)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhoneMode {
    /// Country code, area code in parentheses and `-`/`.`/space separators.
    #[default]
    International,
    /// A bare run of exactly ten digits.
    TenDigit,
}

impl FromStr for PhoneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "international" => Ok(PhoneMode::International),
            "ten_digit" | "ten-digit" => Ok(PhoneMode::TenDigit),
            other => Err(format!(
                "unknown phone mode '{other}' (expected international|ten_digit)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameStrategyKind {
    #[default]
    FirstLine,
    Entity,
}

impl FromStr for NameStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_line" | "first-line" => Ok(NameStrategyKind::FirstLine),
            "entity" | "ner" => Ok(NameStrategyKind::Entity),
            other => Err(format!(
                "unknown name strategy '{other}' (expected first_line|entity)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldConfig {
    pub education: MatchMode,
    pub experience: MatchMode,
    pub phone: PhoneMode,
}

pub struct FieldExtractor {
    name_strategy: Arc<dyn NameStrategy>,
    classifier: SkillClassifier,
    config: FieldConfig,
}

impl FieldExtractor {
    pub fn new(
        name_strategy: Arc<dyn NameStrategy>,
        classifier: SkillClassifier,
        config: FieldConfig,
    ) -> Self {
        Self {
            name_strategy,
            classifier,
            config,
        }
    }

    /// Never fails. Blank text yields a record holding only the filename.
    pub async fn extract_fields(&self, text: &ExtractedText, source_filename: &str) -> CandidateRecord {
        if text.is_empty() {
            debug!("{source_filename}: no text, returning blank record");
            return CandidateRecord::empty(source_filename);
        }
        let text = text.as_str();

        let name = self.name_strategy.extract_name(text).await;
        let classification = self.classifier.classify(text).await;
        let skills = (!classification.matched_skills.is_empty())
            .then(|| classification.matched_skills.join(", "));

        CandidateRecord {
            name,
            email: patterns::find_email(text),
            phone: patterns::find_phone(text, self.config.phone),
            education: patterns::find_education(text, self.config.education),
            skills,
            experience: patterns::find_experience(text, self.config.experience),
            position: classification.position,
            source_filename: source_filename.to_string(),
        }
    }
}
