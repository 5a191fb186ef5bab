//! Embedding provider implementations

mod openai;

pub use openai::{OpenAiEmbeddingProvider, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL};

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
