//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `TextExtractor` trait for turning uploaded bytes into page text
//! - `TextSplitter` trait for splitting text into overlapping chunks
//! - `IngestionReport`, the structured outcome of processing one upload

pub mod chunker;
pub mod extractor;
pub mod report;
pub mod validation;

pub use chunker::{ChunkingConfig, TextSplitter};
pub use extractor::{ExtractedDocument, ExtractedPage, TextExtractor};
pub use report::IngestionReport;
pub use validation::{
    file_extension, is_supported_format, split_file_name, unsupported_format_message,
    SUPPORTED_EXTENSIONS,
};
