//! Knowledge store domain types
//!
//! This module provides:
//! - `DocumentChunk`, the atomic unit of retrieval
//! - `Scope` and `CollectionKey` for tenant partitioning
//! - `VectorIndex`, the boundary to the external vector database
//! - `KnowledgeSource`, the search contract specialists depend on
//! - `StoredDocumentRecord`, the persisted per-source metadata
//! - the fixed "nothing found" sentinel strings

pub mod chunk;
pub mod record;
pub mod scope;
pub mod sentinel;
pub mod source;
pub mod vector_index;

pub use chunk::{ChunkMetadata, DocumentChunk};
pub use record::{RecordMetadata, StoredDocumentRecord};
pub use scope::{CollectionKey, Scope};
pub use source::KnowledgeSource;
pub use sentinel::{is_no_content, no_content_for, NO_DOCUMENTS_UPLOADED, NO_RELEVANT_CONTENT};
pub use vector_index::{DistanceMetric, VectorHit, VectorIndex, VectorPoint};

#[cfg(test)]
pub use source::MockKnowledgeSource;
#[cfg(test)]
pub use vector_index::MockVectorIndex;
