use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{ChunkingConfig, DomainError, FailurePolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub qdrant: QdrantConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub guardrail: GuardrailConfig,
    pub logging: LoggingConfig,
}

/// OpenAI-compatible completion endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// OpenAI-compatible embedding endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub enabled: bool,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    pub enabled: bool,
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the per-category upload folders
    pub root: PathBuf,
    pub metadata_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub classification_sample_chars: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:6334".to_string(),
            api_key: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/files"),
            metadata_file: PathBuf::from("documents_metadata.json"),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            chunk_size: 1000,
            chunk_overlap: 200,
            classification_sample_chars: 2000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the components cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.retrieval.chunking().validate()?;

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration("retrieval.top_k must be greater than 0"));
        }

        if self.retrieval.classification_sample_chars == 0 {
            return Err(DomainError::configuration(
                "retrieval.classification_sample_chars must be greater than 0",
            ));
        }

        if self.embedding.enabled && self.embedding.dimensions == 0 {
            return Err(DomainError::configuration(
                "embedding.dimensions must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DomainError::configuration(
                "llm.temperature must be between 0 and 2",
            ));
        }

        Ok(())
    }

    /// Metadata file path; relative paths sit beside the storage root
    pub fn metadata_path(&self) -> PathBuf {
        if self.storage.metadata_file.is_absolute() {
            return self.storage.metadata_file.clone();
        }

        self.storage
            .root
            .parent()
            .map(|parent| parent.join(&self.storage.metadata_file))
            .unwrap_or_else(|| self.storage.metadata_file.clone())
    }
}
