//! Persisted per-source metadata used to rehydrate the store on restart

use serde::{Deserialize, Serialize};

use super::{ChunkMetadata, Scope};
use crate::domain::Category;

fn default_scope() -> String {
    Scope::DEFAULT.to_string()
}

/// Metadata block stored with each record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub file_type: String,
    pub file_path: String,
    /// Files written before scopes were recorded belong to the default scope
    #[serde(default = "default_scope")]
    pub scope: String,
}

/// One entry of the metadata file, one per saved upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocumentRecord {
    pub filename: String,
    pub metadata: RecordMetadata,
    pub file_path: String,
}

impl StoredDocumentRecord {
    /// Build the record describing the source a chunk came from
    pub fn from_chunk_metadata(meta: &ChunkMetadata) -> Self {
        Self {
            filename: meta.source.clone(),
            metadata: RecordMetadata {
                source: meta.source.clone(),
                category: meta.category,
                file_type: meta.file_type.clone(),
                file_path: meta.file_path.clone(),
                scope: meta.scope.clone(),
            },
            file_path: meta.file_path.clone(),
        }
    }

    /// Chunk metadata template for chunks re-derived from this record
    pub fn chunk_metadata(&self) -> ChunkMetadata {
        let mut meta = ChunkMetadata::new(
            self.metadata.source.clone(),
            self.metadata.category,
            self.metadata.file_type.clone(),
            self.file_path.clone(),
        );
        meta.scope = Scope::new(self.metadata.scope.as_str()).to_string();
        meta
    }
}
