use std::sync::Arc;

use async_trait::async_trait;

use super::vocabulary::SkillVocabulary;
use super::ClassifyError;
use crate::inference::ZeroShotClassifier;

/// Relevance score a skill must exceed to be kept by the semantic matcher.
pub const SEMANTIC_THRESHOLD: f32 = 0.5;

/// Finds which vocabulary skills a resume mentions.
/// Results are always in vocabulary order and free of duplicates.
#[async_trait]
pub trait SkillMatcher: Send + Sync {
    async fn match_skills(
        &self,
        text: &str,
        vocabulary: &SkillVocabulary,
    ) -> Result<Vec<String>, ClassifyError>;

    /// Short label for logs.
    fn label(&self) -> &'static str;
}

/// Case-insensitive substring test per vocabulary entry. Deterministic.
pub struct ExactMatcher;

impl ExactMatcher {
    pub fn matches(text: &str, vocabulary: &SkillVocabulary) -> Vec<String> {
        let haystack = text.to_lowercase();
        vocabulary
            .labels()
            .iter()
            .filter(|label| haystack.contains(&label.to_lowercase()))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SkillMatcher for ExactMatcher {
    async fn match_skills(
        &self,
        text: &str,
        vocabulary: &SkillVocabulary,
    ) -> Result<Vec<String>, ClassifyError> {
        Ok(Self::matches(text, vocabulary))
    }

    fn label(&self) -> &'static str {
        "exact"
    }
}

/// Zero-shot scoring of every vocabulary entry against the whole text.
///
/// Catches paraphrased mentions the substring test misses, at the cost of
/// determinism: scores shift between model versions.
pub struct SemanticMatcher {
    classifier: Arc<dyn ZeroShotClassifier>,
}

impl SemanticMatcher {
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl SkillMatcher for SemanticMatcher {
    async fn match_skills(
        &self,
        text: &str,
        vocabulary: &SkillVocabulary,
    ) -> Result<Vec<String>, ClassifyError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let scores = self
            .classifier
            .classify(text, vocabulary.labels())
            .await
            .map_err(|e| ClassifyError::Model(e.to_string()))?;

        // Re-walk the vocabulary so the model's score ordering never leaks out.
        Ok(vocabulary
            .labels()
            .iter()
            .filter(|label| {
                scores
                    .iter()
                    .any(|s| s.label.eq_ignore_ascii_case(label) && s.score > SEMANTIC_THRESHOLD)
            })
            .cloned()
            .collect())
    }

    fn label(&self) -> &'static str {
        "semantic"
    }
}
