//! PMP Knowledge Desk
//!
//! Domain-routed retrieval and grounded answering over uploaded documents:
//! - Safety guardrail around every query
//! - Query classification into engineering, medical or legal
//! - Specialists answering only from ingested knowledge
//! - Vector search over Qdrant with a local lexical fallback

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::{EmbeddingProvider, LlmProvider, VectorIndex};
use infrastructure::{
    embedding::OpenAiEmbeddingProvider,
    guardrail::SafetyGuardrail,
    ingestion::{DocumentFileStore, IngestionPipeline, RecursiveChunker},
    knowledge::{KnowledgeStore, MetadataFile},
    llm::{HttpClient, OpenAiProvider},
    routing::{LlmClassifier, QueryRouter},
    specialists::{GenerationSettings, SpecialistSet},
    vector::QdrantVectorIndex,
    KnowledgeDesk,
};
use tracing::{info, warn};

/// Create the knowledge desk with default configuration
pub async fn create_desk() -> anyhow::Result<KnowledgeDesk> {
    create_desk_with_config(&AppConfig::default()).await
}

/// Wire every component from `config` and restore previously ingested documents
pub async fn create_desk_with_config(config: &AppConfig) -> anyhow::Result<KnowledgeDesk> {
    config.validate()?;

    let http = HttpClient::with_timeout(Duration::from_secs(config.llm.timeout_secs))?;

    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        http.clone(),
        config.llm.api_key.clone(),
        config.llm.base_url.clone(),
    ));
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "LLM provider configured");

    let store = Arc::new(create_store(config, http)?);
    store.connect().await;

    let splitter = Arc::new(RecursiveChunker::new());
    let files = DocumentFileStore::new(&config.storage.root);
    files.ensure_folders().await?;

    let classifier = Arc::new(LlmClassifier::new(llm.clone(), config.llm.model.clone()));
    let pipeline = IngestionPipeline::new(
        classifier.clone(),
        files,
        splitter,
        config.retrieval.chunking(),
    )
    .with_sample_chars(config.retrieval.classification_sample_chars);

    let specialists = SpecialistSet::grounded(
        store.clone(),
        llm,
        GenerationSettings {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            top_k: config.retrieval.top_k,
        },
    );

    let desk = KnowledgeDesk::new(
        SafetyGuardrail::new(config.guardrail.failure_policy),
        QueryRouter::new(classifier, specialists),
        store,
        pipeline,
    );

    let restored = desk.restore().await;
    info!(chunks = restored, "Knowledge desk ready");

    Ok(desk)
}

fn create_store(config: &AppConfig, http: HttpClient) -> anyhow::Result<KnowledgeStore> {
    let store = KnowledgeStore::new(MetadataFile::new(config.metadata_path()));

    if !config.embedding.enabled || !config.qdrant.enabled {
        info!("Vector search disabled by configuration");
        return Ok(store);
    }

    let index: Arc<dyn VectorIndex> =
        match QdrantVectorIndex::connect(config.qdrant.url.clone(), config.qdrant.api_key.clone()) {
            Ok(index) => Arc::new(index),
            Err(e) => {
                warn!(error = %e, "Qdrant client unavailable, using local search");
                return Ok(store);
            }
        };

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::with_base_url(
            http,
            config.embedding.api_key.clone(),
            config.embedding.base_url.clone(),
        )
        .with_model(config.embedding.model.clone(), config.embedding.dimensions),
    );

    Ok(store.with_vector_backend(embedder, index))
}
