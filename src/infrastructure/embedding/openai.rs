//! OpenAI-compatible embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::{Embedding, EmbeddingInput, EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// Embedding provider speaking the `/v1/embeddings` protocol
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let auth_header = (!api_key.is_empty()).then(|| format!("Bearer {}", api_key));
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    /// Use `model`, whose vectors have `dimensions` components
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        let input = match request.input() {
            EmbeddingInput::Single(s) => serde_json::json!(s),
            EmbeddingInput::Batch(v) => serde_json::json!(v),
        };

        serde_json::json!({
            "model": request.model(),
            "input": input,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<Embedding>, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })?;

        let mut embeddings: Vec<Embedding> = response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.index, d.embedding))
            .collect();
        embeddings.sort_by_key(Embedding::index);

        if let Some(bad) = embeddings.iter().find(|e| e.dimensions() != self.dimensions) {
            return Err(DomainError::provider(
                "openai",
                format!(
                    "Expected {} dimensions, got {}",
                    self.dimensions,
                    bad.dimensions()
                ),
            ));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<Embedding>, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
