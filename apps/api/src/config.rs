use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::fields::{FieldConfig, MatchMode, NameStrategyKind, PhoneMode};
use crate::skills::{RuleMatch, SkillStrategy};

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_concurrent_documents: usize,
    pub document_timeout: Duration,
    pub classification_timeout: Duration,
    pub name_strategy: NameStrategyKind,
    pub skill_strategy: SkillStrategy,
    pub fields: FieldConfig,
    pub position_match: RuleMatch,
    pub taxonomy_path: Option<PathBuf>,
    pub soffice_path: PathBuf,
    pub doc_conversion_enabled: bool,
    pub inference_url: Option<String>,
    pub inference_api_key: Option<String>,
    pub ner_model: String,
    pub zero_shot_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_concurrent_documents: parse_or(&var, "MAX_CONCURRENT_DOCUMENTS", 4)?,
            document_timeout: Duration::from_secs(parse_or(&var, "DOCUMENT_TIMEOUT_SECS", 60)?),
            classification_timeout: Duration::from_secs(parse_or(
                &var,
                "CLASSIFICATION_TIMEOUT_SECS",
                10,
            )?),
            name_strategy: parse_or(&var, "NAME_STRATEGY", NameStrategyKind::FirstLine)?,
            skill_strategy: parse_or(&var, "SKILL_STRATEGY", SkillStrategy::Exact)?,
            fields: FieldConfig {
                education: parse_or(&var, "EDUCATION_MODE", MatchMode::First)?,
                experience: parse_or(&var, "EXPERIENCE_MODE", MatchMode::First)?,
                phone: parse_or(&var, "PHONE_MODE", PhoneMode::International)?,
            },
            position_match: parse_or(&var, "POSITION_MATCH", RuleMatch::AnyOf)?,
            taxonomy_path: non_empty(&var, "TAXONOMY_PATH").map(PathBuf::from),
            soffice_path: non_empty(&var, "SOFFICE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("soffice")),
            doc_conversion_enabled: parse_or(&var, "DOC_CONVERSION_ENABLED", true)?,
            inference_url: non_empty(&var, "INFERENCE_URL"),
            inference_api_key: non_empty(&var, "INFERENCE_API_KEY"),
            ner_model: non_empty(&var, "NER_MODEL")
                .unwrap_or_else(|| "dslim/bert-base-NER".to_string()),
            zero_shot_model: non_empty(&var, "ZERO_SHOT_MODEL")
                .unwrap_or_else(|| "facebook/bart-large-mnli".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// True when any configured strategy calls the inference endpoint.
    pub fn uses_inference(&self) -> bool {
        self.name_strategy == NameStrategyKind::Entity
            || self.skill_strategy == SkillStrategy::Semantic
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_documents == 0 {
            bail!("MAX_CONCURRENT_DOCUMENTS must be at least 1");
        }
        if self.document_timeout.is_zero() || self.classification_timeout.is_zero() {
            bail!("DOCUMENT_TIMEOUT_SECS and CLASSIFICATION_TIMEOUT_SECS must be at least 1");
        }
        if self.uses_inference() && self.inference_url.is_none() {
            bail!(
                "INFERENCE_URL is required when NAME_STRATEGY=entity or SKILL_STRATEGY=semantic"
            );
        }
        Ok(())
    }
}

fn non_empty(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match non_empty(var, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Invalid value '{raw}' for {key}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_concurrent_documents, 4);
        assert_eq!(config.document_timeout, Duration::from_secs(60));
        assert_eq!(config.classification_timeout, Duration::from_secs(10));
        assert_eq!(config.name_strategy, NameStrategyKind::FirstLine);
        assert_eq!(config.skill_strategy, SkillStrategy::Exact);
        assert_eq!(config.fields, FieldConfig::default());
        assert_eq!(config.position_match, RuleMatch::AnyOf);
        assert_eq!(config.soffice_path, PathBuf::from("soffice"));
        assert!(config.doc_conversion_enabled);
        assert!(config.taxonomy_path.is_none());
        assert!(!config.uses_inference());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("EDUCATION_MODE", "all"),
            ("PHONE_MODE", "ten_digit"),
            ("POSITION_MATCH", "all_of"),
            ("DOC_CONVERSION_ENABLED", "false"),
            ("TAXONOMY_PATH", "/etc/resume/taxonomy.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.fields.education, MatchMode::All);
        assert_eq!(config.fields.experience, MatchMode::First);
        assert_eq!(config.fields.phone, PhoneMode::TenDigit);
        assert_eq!(config.position_match, RuleMatch::AllOf);
        assert!(!config.doc_conversion_enabled);
        assert_eq!(
            config.taxonomy_path.as_deref(),
            Some(std::path::Path::new("/etc/resume/taxonomy.json"))
        );
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = load(&[("EXPERIENCE_MODE", "most")]).unwrap_err();
        assert!(format!("{err:#}").contains("EXPERIENCE_MODE"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(load(&[("MAX_CONCURRENT_DOCUMENTS", "0")]).is_err());
    }

    #[test]
    fn test_model_strategy_requires_inference_url() {
        assert!(load(&[("SKILL_STRATEGY", "semantic")]).is_err());
        assert!(load(&[("NAME_STRATEGY", "entity")]).is_err());
        let config = load(&[
            ("NAME_STRATEGY", "entity"),
            ("INFERENCE_URL", "https://api-inference.huggingface.co/models"),
        ])
        .unwrap();
        assert!(config.uses_inference());
    }
}
