//! Knowledge store implementation
//!
//! This module provides:
//! - `KnowledgeStore`, the owned store shared by ingestion and specialists
//! - `LexicalScoring`, the local fallback ranking
//! - `MetadataFile`, the per-source JSON metadata used for rehydration

pub mod lexical;
pub mod metadata_file;
pub mod store;

pub use lexical::LexicalScoring;
pub use metadata_file::MetadataFile;
pub use store::{CategoryCount, KnowledgeStore, StoreStats};
