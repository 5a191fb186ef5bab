//! Document ingestion infrastructure
//!
//! This module provides the text extraction strategies, the recursive
//! splitter, the category folders holding raw uploads, and the pipeline
//! tying them together.

pub mod chunkers;
pub mod document_store;
pub mod extractors;
pub mod pipeline;

pub use chunkers::RecursiveChunker;
pub use document_store::DocumentFileStore;
pub use extractors::ExtractorChain;
pub use pipeline::{build_chunks, extract_document, IngestionPipeline};
