//! Text extraction strategy trait and types

use std::fmt::Debug;

use crate::domain::DomainError;

/// Text of one page (or one logical section for formats without pages)
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    /// Zero-based page number
    pub number: usize,
    pub content: String,
}

impl ExtractedPage {
    pub fn new(number: usize, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Output of the first extraction strategy that produced content
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub pages: Vec<ExtractedPage>,
    /// Name of the strategy that produced the pages
    pub extractor: &'static str,
}

impl ExtractedDocument {
    pub fn new(pages: Vec<ExtractedPage>, extractor: &'static str) -> Self {
        Self { pages, extractor }
    }

    /// Whether at least one page carries non-whitespace text
    pub fn has_content(&self) -> bool {
        self.pages.iter().any(|p| !p.is_blank())
    }

    /// Non-blank page texts joined by newlines
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// One way of turning raw file bytes into page text
///
/// Implementations are tried in order until one yields non-empty content.
pub trait TextExtractor: Send + Sync + Debug {
    /// Extract page text from the raw file bytes
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError>;

    /// Strategy name used in logs
    fn name(&self) -> &'static str;
}
