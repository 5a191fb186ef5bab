//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{Embedding, EmbeddingRequest};
use crate::domain::DomainError;

/// Trait for embedding services. Assumed deterministic for identical input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate one embedding per input text, in input order
    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<Embedding>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model used when the caller does not pick one
    fn model(&self) -> &str;

    /// Fixed length of every vector this provider returns
    fn dimensions(&self) -> usize;

    /// Embed a single text with the provider's model
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(self.model(), text);

        self.embed(request)
            .await?
            .into_iter()
            .next()
            .map(Embedding::into_vector)
            .ok_or_else(|| DomainError::provider(self.provider_name(), "Empty embedding response"))
    }
}
