//! Skill classification: vocabulary matching plus first-match position inference.
//!
//! Default matcher: `ExactMatcher` (substring, deterministic).
//! Optional: `SemanticMatcher` (zero-shot model), bounded by a timeout and always
//! backed by exact matching when the model is slow or unavailable.

pub mod matcher;
pub mod position;
pub mod vocabulary;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub use matcher::{ExactMatcher, SemanticMatcher, SkillMatcher};
pub use position::{infer_position, RuleMatch};
pub use vocabulary::Taxonomy;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("Classification model error: {0}")]
    Model(String),
}

/// Which matcher the classifier starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillStrategy {
    #[default]
    Exact,
    Semantic,
}

impl FromStr for SkillStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(SkillStrategy::Exact),
            "semantic" => Ok(SkillStrategy::Semantic),
            other => Err(format!("unknown skill strategy '{other}' (expected exact|semantic)")),
        }
    }
}

/// Matched skills (vocabulary order) and the inferred position, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub matched_skills: Vec<String>,
    pub position: Option<String>,
}

/// Read-only after construction; share it behind `Arc` across workers.
pub struct SkillClassifier {
    taxonomy: Arc<Taxonomy>,
    matcher: Arc<dyn SkillMatcher>,
    rule_match: RuleMatch,
    timeout: Duration,
}

impl SkillClassifier {
    pub fn new(taxonomy: Arc<Taxonomy>, matcher: Arc<dyn SkillMatcher>, timeout: Duration) -> Self {
        Self {
            taxonomy,
            matcher,
            rule_match: RuleMatch::default(),
            timeout,
        }
    }

    /// Exact matching with the default any-of rule semantics.
    #[cfg(test)]
    pub fn exact(taxonomy: Arc<Taxonomy>) -> Self {
        Self::new(taxonomy, Arc::new(ExactMatcher), Duration::from_secs(10))
    }

    pub fn with_rule_match(mut self, rule_match: RuleMatch) -> Self {
        self.rule_match = rule_match;
        self
    }

    /// Never fails: a slow or broken matcher degrades to exact matching.
    pub async fn classify(&self, text: &str) -> Classification {
        let vocabulary = &self.taxonomy.vocabulary;
        let matched_skills = match self.run_matcher(text).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!(
                    "{} skill matcher failed, falling back to exact: {e}",
                    self.matcher.label()
                );
                ExactMatcher::matches(text, vocabulary)
            }
        };
        let position = infer_position(&matched_skills, &self.taxonomy.rules, self.rule_match);
        Classification {
            matched_skills,
            position,
        }
    }

    async fn run_matcher(&self, text: &str) -> Result<Vec<String>, ClassifyError> {
        let vocabulary = &self.taxonomy.vocabulary;
        tokio::time::timeout(self.timeout, self.matcher.match_skills(text, vocabulary))
            .await
            .map_err(|_| ClassifyError::Timeout(self.timeout))?
    }
}
