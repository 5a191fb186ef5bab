//! Document chunk

use serde::{Deserialize, Serialize};

use crate::domain::{Category, DomainError};

/// Metadata attached to every chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Original filename of the uploaded document
    pub source: String,
    /// Category assigned at ingestion, immutable afterwards
    pub category: Category,
    /// File type (extension without the dot)
    #[serde(rename = "type")]
    pub file_type: String,
    /// Path of the saved source file
    pub file_path: String,
    /// Ordinal of this chunk within its source
    pub chunk_index: usize,
    /// Number of chunks produced from the whole source
    pub total_chunks: usize,
    /// Zero-based page the chunk was cut from
    pub page_number: usize,
    /// Tenant scope the chunk was inserted under
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Where the chunk came from (always `pdf` for uploaded documents)
    #[serde(default = "default_source_type")]
    pub source_type: String,
}

fn default_scope() -> String {
    super::Scope::DEFAULT.to_string()
}

fn default_source_type() -> String {
    "pdf".to_string()
}

impl ChunkMetadata {
    /// Metadata for a chunk of `source`, stored at `file_path`
    pub fn new(
        source: impl Into<String>,
        category: Category,
        file_type: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            category,
            file_type: file_type.into(),
            file_path: file_path.into(),
            chunk_index: 0,
            total_chunks: 1,
            page_number: 0,
            scope: default_scope(),
            source_type: default_source_type(),
        }
    }

    /// Set position information
    pub fn at(mut self, chunk_index: usize, total_chunks: usize, page_number: usize) -> Self {
        self.chunk_index = chunk_index;
        self.total_chunks = total_chunks;
        self.page_number = page_number;
        self
    }
}

/// A bounded-length span of a source document's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Create a chunk, rejecting empty or whitespace-only text
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Result<Self, DomainError> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(DomainError::validation("chunk text must not be empty"));
        }

        Ok(Self { text, metadata })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.metadata.category
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    pub fn scope(&self) -> &str {
        &self.metadata.scope
    }
}
