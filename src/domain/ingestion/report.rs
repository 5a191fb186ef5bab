//! Ingestion outcome

use serde::Serialize;

use crate::domain::knowledge::DocumentChunk;
use crate::domain::Category;

/// Result of processing one uploaded document
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub text_length: usize,
    pub num_chunks: usize,
    pub num_pages: usize,
    /// First 200 characters of the extracted text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sample_text: String,
    /// Human-readable failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub chunks: Vec<DocumentChunk>,
}

impl IngestionReport {
    /// Create a failed report
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            category: None,
            filename: filename.into(),
            file_path: None,
            file_type: None,
            text_length: 0,
            num_chunks: 0,
            num_pages: 0,
            sample_text: String::new(),
            error: Some(error.into()),
            chunks: Vec::new(),
        }
    }

    /// Create a successful report carrying the produced chunks
    pub fn succeeded(
        filename: impl Into<String>,
        category: Category,
        file_path: impl Into<String>,
        file_type: impl Into<String>,
        chunks: Vec<DocumentChunk>,
    ) -> Self {
        Self {
            success: true,
            category: Some(category),
            filename: filename.into(),
            file_path: Some(file_path.into()),
            file_type: Some(file_type.into()),
            text_length: 0,
            num_chunks: chunks.len(),
            num_pages: 0,
            sample_text: String::new(),
            error: None,
            chunks,
        }
    }

    /// Record text statistics
    pub fn with_text_stats(mut self, text: &str, num_pages: usize) -> Self {
        self.text_length = text.chars().count();
        self.sample_text = text.chars().take(200).collect();
        self.num_pages = num_pages;
        self
    }

    /// Turn a processed report into a failure, keeping the text statistics
    pub fn mark_failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    /// Caller-facing summary line
    pub fn summary(&self) -> String {
        match (&self.error, self.category) {
            (Some(error), _) => format!("Failed to process '{}': {}", self.filename, error),
            (None, Some(category)) => format!(
                "Document '{}' successfully processed and categorized as '{}'",
                self.filename, category
            ),
            (None, None) => format!("Document '{}' processed", self.filename),
        }
    }
}
