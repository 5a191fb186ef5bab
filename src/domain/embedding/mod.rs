//! Embedding provider domain models and traits

mod provider;
mod types;

pub use provider::EmbeddingProvider;
pub use types::{cosine_similarity, Embedding, EmbeddingInput, EmbeddingRequest};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
