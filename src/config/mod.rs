//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, GuardrailConfig, LlmConfig, LogFormat, LoggingConfig,
    QdrantConfig, RetrievalConfig, StorageConfig,
};
