//! Text extraction strategies and the per-format strategy chain

mod docx;
mod legacy_doc;
mod pdf;
mod plain_text;

pub use docx::DocxExtractor;
pub use legacy_doc::PrintableRunExtractor;
pub use pdf::{
    PdfContentStreamExtractor, PdfLayoutExtractor, PdfObjectTreeExtractor, PdfTextExtractor,
};
pub use plain_text::PlainTextExtractor;

use tracing::{debug, warn};

use crate::domain::ingestion::{ExtractedDocument, TextExtractor};
use crate::domain::DomainError;

/// Ordered list of extraction strategies for one file format
///
/// The first strategy producing non-blank text wins. Strategy failures are
/// logged and skipped.
#[derive(Debug)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorChain {
    pub fn new(extractors: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    /// Strategy chain for a lowercased extension such as `.pdf`
    pub fn for_extension(extension: &str) -> Option<Self> {
        let extractors: Vec<Box<dyn TextExtractor>> = match extension {
            ".pdf" => vec![
                Box::new(PdfTextExtractor),
                Box::new(PdfLayoutExtractor),
                Box::new(PdfObjectTreeExtractor),
                Box::new(PdfContentStreamExtractor),
            ],
            ".docx" => vec![Box::new(DocxExtractor)],
            ".txt" => vec![Box::new(PlainTextExtractor)],
            ".doc" => vec![Box::new(PrintableRunExtractor::default())],
            _ => return None,
        };

        Some(Self::new(extractors))
    }

    /// Run the strategies in order
    ///
    /// Returns a blank document when strategies succeeded but found no text,
    /// and an error when every strategy failed.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, DomainError> {
        let mut blank: Option<ExtractedDocument> = None;

        for extractor in &self.extractors {
            match extractor.extract(bytes) {
                Ok(pages) => {
                    let document = ExtractedDocument::new(pages, extractor.name());

                    if document.has_content() {
                        debug!(
                            extractor = extractor.name(),
                            pages = document.page_count(),
                            "Extracted document text"
                        );
                        return Ok(document);
                    }

                    debug!(extractor = extractor.name(), "Extractor produced no text");
                    if blank.is_none() && document.page_count() > 0 {
                        blank = Some(document);
                    }
                }
                Err(e) => {
                    warn!(extractor = extractor.name(), error = %e, "Extraction strategy failed");
                }
            }
        }

        blank.ok_or_else(|| {
            DomainError::extraction("chain", "Could not extract content from document")
        })
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::extractor::mock::MockTextExtractor;

    #[test]
    fn test_chain_per_extension() {
        assert_eq!(ExtractorChain::for_extension(".pdf").unwrap().len(), 4);
        assert_eq!(ExtractorChain::for_extension(".docx").unwrap().len(), 1);
        assert_eq!(ExtractorChain::for_extension(".txt").unwrap().len(), 1);
        assert_eq!(ExtractorChain::for_extension(".doc").unwrap().len(), 1);
        assert!(ExtractorChain::for_extension(".pptx").is_none());
    }

    #[test]
    fn test_first_non_blank_strategy_wins() {
        let chain = ExtractorChain::new(vec![
            Box::new(MockTextExtractor::failing("broken", "corrupt xref")),
            Box::new(MockTextExtractor::returning("blank", vec!["  "])),
            Box::new(MockTextExtractor::returning("good", vec!["page one", "page two"])),
            Box::new(MockTextExtractor::returning("unused", vec!["never"])),
        ]);

        let document = chain.extract(b"%PDF").unwrap();

        assert_eq!(document.extractor, "good");
        assert_eq!(document.full_text(), "page one\npage two");
    }

    #[test]
    fn test_all_blank_returns_blank_document() {
        let chain = ExtractorChain::new(vec![Box::new(MockTextExtractor::returning(
            "blank",
            vec!["", "\n"],
        ))]);

        let document = chain.extract(b"").unwrap();
        assert!(!document.has_content());
    }

    #[test]
    fn test_all_failed_is_error() {
        let chain = ExtractorChain::new(vec![
            Box::new(MockTextExtractor::failing("a", "nope")),
            Box::new(MockTextExtractor::returning("empty", vec![])),
        ]);

        let error = chain.extract(b"garbage").unwrap_err();
        assert!(error.to_string().contains("Could not extract content from document"));
    }

    #[test]
    fn test_plain_text_chain_end_to_end() {
        let chain = ExtractorChain::for_extension(".txt").unwrap();
        let document = chain.extract("Lease term is twelve months.".as_bytes()).unwrap();

        assert_eq!(document.full_text(), "Lease term is twelve months.");
        assert_eq!(document.extractor, "plain_text");
    }
}
