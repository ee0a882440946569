//! Name strategies: pluggable, trait-based candidate-name extraction.
//!
//! Default: `FirstLineName` (first non-empty line, deterministic, no model).
//! Optional: `EntityName` (first person entity from the NER model), which always
//! falls back to `FirstLineName` when the model finds nobody, errors or times out.
//!
//! `FieldExtractor` holds an `Arc<dyn NameStrategy>`, chosen at startup via config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::inference::EntityRecognizer;

/// Entities scored below this are ignored.
const MIN_ENTITY_SCORE: f32 = 0.5;

#[async_trait]
pub trait NameStrategy: Send + Sync {
    async fn extract_name(&self, text: &str) -> Option<String>;

    /// Short label for logs.
    fn label(&self) -> &'static str;
}

/// The first non-empty line of the document. Fragile against letterheads,
/// but right for the common resume that opens with the candidate's name.
pub struct FirstLineName;

#[async_trait]
impl NameStrategy for FirstLineName {
    async fn extract_name(&self, text: &str) -> Option<String> {
        first_non_empty_line(text)
    }

    fn label(&self) -> &'static str {
        "first_line"
    }
}

fn first_non_empty_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}

/// First person entity in document order, with an explicit fallback strategy.
pub struct EntityName {
    recognizer: Arc<dyn EntityRecognizer>,
    fallback: Arc<dyn NameStrategy>,
    timeout: Duration,
}

impl EntityName {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, timeout: Duration) -> Self {
        Self {
            recognizer,
            fallback: Arc::new(FirstLineName),
            timeout,
        }
    }

    async fn first_person(&self, text: &str) -> Option<String> {
        let entities = match tokio::time::timeout(self.timeout, self.recognizer.recognize(text)).await {
            Ok(Ok(entities)) => entities,
            Ok(Err(e)) => {
                warn!("Entity recognizer failed, using fallback: {e}");
                return None;
            }
            Err(_) => {
                warn!("Entity recognizer timed out after {:?}, using fallback", self.timeout);
                return None;
            }
        };

        let mut people: Vec<_> = entities
            .into_iter()
            .filter(|e| e.is_person() && e.score >= MIN_ENTITY_SCORE)
            .collect();
        people.sort_by_key(|e| e.start);

        people
            .into_iter()
            .map(|e| e.word.trim().to_string())
            .find(|w| !w.is_empty())
    }
}

#[async_trait]
impl NameStrategy for EntityName {
    async fn extract_name(&self, text: &str) -> Option<String> {
        if let Some(name) = self.first_person(text).await {
            return Some(name);
        }
        debug!("No person entity found, falling back to {}", self.fallback.label());
        self.fallback.extract_name(text).await
    }

    fn label(&self) -> &'static str {
        "entity"
    }
}
