use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::extraction::{DocxRsText, FormatAdapter, PdfExtractText, SofficeConverter};
use crate::fields::{EntityName, FieldExtractor, FirstLineName, NameStrategy, NameStrategyKind};
use crate::inference::InferenceClient;
use crate::pipeline::Pipeline;
use crate::skills::{ExactMatcher, SemanticMatcher, SkillClassifier, SkillMatcher, SkillStrategy, Taxonomy};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup. Holds only read-only tables and model handles.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let pipeline = build_pipeline(config)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
        })
    }
}

/// Wires decoders, strategies and the taxonomy according to config.
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let taxonomy = match &config.taxonomy_path {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("Failed to load taxonomy from {}", path.display()))?,
        None => Taxonomy::default(),
    };
    info!(
        "Taxonomy: {} skills, {} position rules",
        taxonomy.vocabulary.len(),
        taxonomy.rules.len()
    );

    let inference = if config.uses_inference() {
        let url = config
            .inference_url
            .clone()
            .context("INFERENCE_URL is required for model-based strategies")?;
        let client = InferenceClient::new(
            url,
            config.inference_api_key.clone(),
            config.ner_model.clone(),
            config.zero_shot_model.clone(),
        )
        .context("Failed to build inference client")?;
        Some(Arc::new(client))
    } else {
        None
    };

    let name_strategy: Arc<dyn NameStrategy> = match (config.name_strategy, &inference) {
        (NameStrategyKind::Entity, Some(client)) => Arc::new(EntityName::new(
            client.clone(),
            config.classification_timeout,
        )),
        _ => Arc::new(FirstLineName),
    };

    let matcher: Arc<dyn SkillMatcher> = match (config.skill_strategy, &inference) {
        (SkillStrategy::Semantic, Some(client)) => Arc::new(SemanticMatcher::new(client.clone())),
        _ => Arc::new(ExactMatcher),
    };
    info!(
        "Strategies: name={}, skills={}, positions={:?}",
        name_strategy.label(),
        matcher.label(),
        config.position_match
    );

    let classifier = SkillClassifier::new(Arc::new(taxonomy), matcher, config.classification_timeout)
        .with_rule_match(config.position_match);
    let extractor = FieldExtractor::new(name_strategy, classifier, config.fields);

    let mut adapter = FormatAdapter::new(
        Arc::new(PdfExtractText),
        Arc::new(DocxRsText),
        config.document_timeout,
    );
    if config.doc_conversion_enabled {
        adapter = adapter.with_converter(Arc::new(SofficeConverter::new(config.soffice_path.clone())));
    } else {
        info!("Legacy .doc conversion disabled");
    }

    Ok(Pipeline::new(adapter, extractor, config.max_concurrent_documents))
}
