//! Inference client: the single point of entry for the optional NLP models.
//!
//! Both the named-entity recognizer (name extraction) and the zero-shot classifier
//! (semantic skill matching) go through this client. It is built once at startup
//! and shared read-only as `Arc<InferenceClient>`.
//!
//! Wire format follows the Hugging Face Inference API: `POST {base}/{model}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed model output: {0}")]
    Malformed(String),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// One entity span reported by the recognizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    #[serde(alias = "entity")]
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default)]
    pub score: f32,
}

impl Entity {
    /// True for `PER`, `PERSON`, `B-PER`, `I-PER` and friends.
    pub fn is_person(&self) -> bool {
        let label = self
            .entity_group
            .rsplit_once('-')
            .map(|(_, l)| l)
            .unwrap_or(&self.entity_group);
        label.eq_ignore_ascii_case("PER") || label.eq_ignore_ascii_case("PERSON")
    }
}

/// A candidate label and its relevance score in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Named-entity recognition capability.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, InferenceError>;
}

/// Zero-shot classification capability. Scores every candidate label independently.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>, InferenceError>;
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// HTTP client for the hosted NER and zero-shot models, with retry logic.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    ner_model: String,
    zero_shot_model: String,
}

impl InferenceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        ner_model: impl Into<String>,
        zero_shot_model: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            ner_model: ner_model.into(),
            zero_shot_model: zero_shot_model.into(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    /// POSTs a JSON body to a model endpoint and deserializes the reply.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn post_json<B, T>(&self, model: &str, body: &B) -> Result<T, InferenceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.model_url(model);
        let mut last_error: Option<InferenceError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Inference call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&url).json(body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(InferenceError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Inference API returned {}: {}", status, body);
                last_error = Some(InferenceError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(InferenceError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: T = response.json().await?;
            debug!(model, "Inference call succeeded");
            return Ok(parsed);
        }

        Err(exhausted(last_error))
    }
}

/// Final error once every attempt has failed. A trailing 429 reports as rate limiting.
fn exhausted(last_error: Option<InferenceError>) -> InferenceError {
    match last_error {
        Some(InferenceError::Api { status: 429, .. }) | None => InferenceError::RateLimited {
            retries: MAX_RETRIES,
        },
        Some(other) => other,
    }
}

#[async_trait]
impl EntityRecognizer for InferenceClient {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        self.post_json(&self.ner_model, &NerRequest { inputs: text })
            .await
    }
}

#[async_trait]
impl ZeroShotClassifier for InferenceClient {
    async fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>, InferenceError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
                multi_label: true,
            },
        };
        let response: ZeroShotResponse = self.post_json(&self.zero_shot_model, &request).await?;
        pair_scores(response)
    }
}

fn pair_scores(response: ZeroShotResponse) -> Result<Vec<LabelScore>, InferenceError> {
    if response.labels.len() != response.scores.len() {
        return Err(InferenceError::Malformed(format!(
            "{} labels but {} scores",
            response.labels.len(),
            response.scores.len()
        )));
    }
    Ok(response
        .labels
        .into_iter()
        .zip(response.scores)
        .map(|(label, score)| LabelScore { label, score })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_labels() {
        let entity = |label: &str| Entity {
            entity_group: label.to_string(),
            word: "Jane".to_string(),
            start: 0,
            end: 4,
            score: 0.99,
        };
        assert!(entity("PER").is_person());
        assert!(entity("B-PER").is_person());
        assert!(entity("PERSON").is_person());
        assert!(!entity("ORG").is_person());
        assert!(!entity("B-LOC").is_person());
    }

    #[test]
    fn test_entity_deserializes_aggregated_and_token_output() {
        let aggregated: Vec<Entity> = serde_json::from_str(
            r#"[{"entity_group":"PER","word":"Jane Doe","start":0,"end":8,"score":0.998}]"#,
        )
        .unwrap();
        assert_eq!(aggregated[0].word, "Jane Doe");

        let token: Vec<Entity> =
            serde_json::from_str(r#"[{"entity":"B-PER","word":"Jane","score":0.9}]"#).unwrap();
        assert!(token[0].is_person());
        assert_eq!(token[0].start, 0);
    }

    #[test]
    fn test_pair_scores_zips_labels() {
        let response: ZeroShotResponse = serde_json::from_str(
            r#"{"sequence":"...","labels":["Python","Java"],"scores":[0.91,0.12]}"#,
        )
        .unwrap();
        let scores = pair_scores(response).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "Python");
        assert!((scores[1].score - 0.12).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pair_scores_rejects_length_mismatch() {
        let response = ZeroShotResponse {
            labels: vec!["Python".to_string()],
            scores: vec![],
        };
        assert!(matches!(
            pair_scores(response),
            Err(InferenceError::Malformed(_))
        ));
    }

    #[test]
    fn test_trailing_429_reports_rate_limited() {
        let err = exhausted(Some(InferenceError::Api {
            status: 429,
            message: "Too Many Requests".to_string(),
        }));
        assert!(matches!(err, InferenceError::RateLimited { retries: 3 }));
        assert_eq!(err.to_string(), "Rate limited after 3 retries");
    }

    #[test]
    fn test_trailing_server_error_is_kept() {
        let err = exhausted(Some(InferenceError::Api {
            status: 503,
            message: "loading".to_string(),
        }));
        assert!(matches!(err, InferenceError::Api { status: 503, .. }));
    }

    #[test]
    fn test_model_url_trims_trailing_slash() {
        let client = InferenceClient::new(
            "https://models.example.com/",
            None,
            "dslim/bert-base-NER",
            "facebook/bart-large-mnli",
        )
        .unwrap();
        assert_eq!(
            client.model_url("dslim/bert-base-NER"),
            "https://models.example.com/dslim/bert-base-NER"
        );
    }
}
