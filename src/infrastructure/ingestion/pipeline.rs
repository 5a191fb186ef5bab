//! Upload processing: validate, extract, classify, save, chunk

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::ingestion::{
    file_extension, is_supported_format, unsupported_format_message, ChunkingConfig,
    ExtractedDocument, IngestionReport, TextSplitter,
};
use crate::domain::{ChunkMetadata, DocumentChunk, DomainError};
use crate::infrastructure::routing::LlmClassifier;

use super::document_store::DocumentFileStore;
use super::extractors::ExtractorChain;

pub const EXTRACTION_FAILED: &str = "Could not extract content from document";
pub const EMPTY_DOCUMENT: &str = "Document appears to be empty";
pub const SAVE_FAILED: &str = "Could not save document file";

/// Default number of characters shown to the document classifier
pub const DEFAULT_CLASSIFICATION_SAMPLE_CHARS: usize = 2000;

/// Split every non-blank page into chunks stamped with `template`
///
/// Chunk indices run across pages; every chunk records the total for the
/// whole source.
pub fn build_chunks(
    document: &ExtractedDocument,
    template: &ChunkMetadata,
    splitter: &dyn TextSplitter,
    config: &ChunkingConfig,
) -> Result<Vec<DocumentChunk>, DomainError> {
    let mut pieces: Vec<(usize, String)> = Vec::new();

    for page in document.pages.iter().filter(|p| !p.is_blank()) {
        for piece in splitter.split(&page.content, config)? {
            if !piece.trim().is_empty() {
                pieces.push((page.number, piece));
            }
        }
    }

    let total = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, (page, text))| DocumentChunk::new(text, template.clone().at(index, total, page)))
        .collect()
}

/// Run the extractor chain for `extension` off the async runtime
pub async fn extract_document(
    bytes: Arc<Vec<u8>>,
    extension: &str,
) -> Result<ExtractedDocument, DomainError> {
    let chain = ExtractorChain::for_extension(extension)
        .ok_or_else(|| DomainError::validation(unsupported_format_message()))?;

    tokio::task::spawn_blocking(move || chain.extract(&bytes))
        .await
        .map_err(|e| DomainError::internal(format!("Extraction task failed: {}", e)))?
}

/// Turns raw uploads into classified, saved and chunked documents
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    classifier: Arc<LlmClassifier>,
    files: DocumentFileStore,
    splitter: Arc<dyn TextSplitter>,
    chunking: ChunkingConfig,
    sample_chars: usize,
}

impl IngestionPipeline {
    pub fn new(
        classifier: Arc<LlmClassifier>,
        files: DocumentFileStore,
        splitter: Arc<dyn TextSplitter>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            classifier,
            files,
            splitter,
            chunking,
            sample_chars: DEFAULT_CLASSIFICATION_SAMPLE_CHARS,
        }
    }

    pub fn with_sample_chars(mut self, sample_chars: usize) -> Self {
        self.sample_chars = sample_chars;
        self
    }

    pub fn splitter(&self) -> Arc<dyn TextSplitter> {
        self.splitter.clone()
    }

    pub fn chunking(&self) -> &ChunkingConfig {
        &self.chunking
    }

    /// Process one upload; failures are reported, never raised
    pub async fn process(&self, bytes: Vec<u8>, filename: &str) -> IngestionReport {
        if !is_supported_format(filename) {
            warn!(filename, "Rejected unsupported file format");
            return IngestionReport::failed(filename, unsupported_format_message());
        }

        let extension = file_extension(filename);
        let bytes = Arc::new(bytes);

        let document = match extract_document(bytes.clone(), &extension).await {
            Ok(document) => document,
            Err(e) => {
                warn!(filename, error = %e, "No extraction strategy succeeded");
                return IngestionReport::failed(filename, EXTRACTION_FAILED);
            }
        };

        if !document.has_content() {
            warn!(filename, extractor = document.extractor, "Extracted text is empty");
            return IngestionReport::failed(filename, EMPTY_DOCUMENT);
        }

        let text = document.full_text();
        debug!(
            filename,
            extractor = document.extractor,
            chars = text.chars().count(),
            "Document text extracted"
        );

        let (category, _) = self
            .classifier
            .classify_document(filename, &text, self.sample_chars)
            .await;

        let path = match self.files.save(&bytes, filename, category).await {
            Ok(path) => path,
            Err(e) => {
                error!(filename, error = %e, "Failed to save document");
                return IngestionReport::failed(filename, SAVE_FAILED);
            }
        };
        let file_path = path.to_string_lossy().into_owned();
        let file_type = extension.trim_start_matches('.').to_string();

        let template = ChunkMetadata::new(filename, category, file_type.clone(), file_path.clone());
        let chunks = match build_chunks(&document, &template, self.splitter.as_ref(), &self.chunking)
        {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(filename, error = %e, "Failed to split document");
                return IngestionReport::failed(filename, e.to_string());
            }
        };

        info!(
            source = filename,
            category = %category,
            chunks = chunks.len(),
            "Document processed"
        );

        IngestionReport::succeeded(filename, category, file_path, file_type, chunks)
            .with_text_stats(&text, document.page_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::ExtractedPage;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::Category;
    use crate::infrastructure::ingestion::RecursiveChunker;

    fn pipeline(provider: MockLlmProvider, root: &std::path::Path) -> IngestionPipeline {
        let classifier = Arc::new(LlmClassifier::new(Arc::new(provider), "gpt-3.5-turbo"));
        IngestionPipeline::new(
            classifier,
            DocumentFileStore::new(root),
            Arc::new(RecursiveChunker::new()),
            ChunkingConfig::default(),
        )
    }

    #[test]
    fn test_build_chunks_indexes_across_pages() {
        let document = ExtractedDocument::new(
            vec![
                ExtractedPage::new(0, "alpha beta gamma delta"),
                ExtractedPage::new(1, "   "),
                ExtractedPage::new(2, "epsilon zeta eta theta"),
            ],
            "test",
        );
        let template = ChunkMetadata::new("a.pdf", Category::Legal, "pdf", "/f/a.pdf");

        let chunks = build_chunks(
            &document,
            &template,
            &RecursiveChunker::new(),
            &ChunkingConfig::new(12, 0),
        )
        .unwrap();

        assert_eq!(chunks.len(), 4);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i);
            assert_eq!(chunk.metadata.total_chunks, 4);
            assert_eq!(chunk.category(), Category::Legal);
        }
        assert_eq!(chunks[0].metadata.page_number, 0);
        assert_eq!(chunks[3].metadata.page_number, 2);
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockLlmProvider::new("mock");
        let pipeline = pipeline(provider, dir.path());

        let report = pipeline.process(b"MZ".to_vec(), "setup.exe").await;

        assert!(!report.success);
        assert_eq!(
            report.error.as_deref(),
            Some("Unsupported file format. Supported: [.pdf, .docx, .txt, .doc]")
        );
    }

    #[tokio::test]
    async fn test_empty_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockLlmProvider::new("mock"), dir.path());

        let report = pipeline.process(b"  \n ".to_vec(), "blank.txt").await;

        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some(EMPTY_DOCUMENT));
    }

    #[tokio::test]
    async fn test_unreadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockLlmProvider::new("mock"), dir.path());

        let report = pipeline.process(b"not a pdf at all".to_vec(), "broken.pdf").await;

        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some(EXTRACTION_FAILED));
    }

    #[tokio::test]
    async fn test_text_file_is_classified_saved_and_chunked() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(
            MockLlmProvider::new("mock").with_reply(r#"{"category": "medical"}"#),
            dir.path(),
        );
        let body = "Rest, ice, compression and elevation help a sprained ankle.";

        let report = pipeline.process(body.as_bytes().to_vec(), "First-Aid.TXT").await;

        assert!(report.success);
        assert_eq!(report.category, Some(Category::Medical));
        assert_eq!(report.file_type.as_deref(), Some("txt"));
        assert_eq!(report.num_chunks, 1);
        assert_eq!(report.num_pages, 1);
        assert_eq!(report.text_length, body.chars().count());
        assert_eq!(report.chunks[0].text(), body);

        let saved = std::path::PathBuf::from(report.file_path.unwrap());
        assert!(saved.starts_with(dir.path().join("Doctor")));
        assert_eq!(std::fs::read_to_string(saved).unwrap(), body);
    }

    #[tokio::test]
    async fn test_reingest_under_new_name_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(
            MockLlmProvider::new("mock")
                .with_reply(r#"{"category": "legal"}"#)
                .with_reply(r#"{"category": "legal"}"#),
            dir.path(),
        );
        let body = "The tenant shall pay rent. ".repeat(120);

        let first = pipeline.process(body.clone().into_bytes(), "lease.txt").await;
        let second = pipeline.process(body.into_bytes(), "lease-copy.txt").await;

        assert_eq!(first.category, second.category);
        assert_eq!(first.num_chunks, second.num_chunks);
        assert!(first.num_chunks > 1);
    }

    #[tokio::test]
    async fn test_classifier_outage_defaults_to_engineering() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(MockLlmProvider::new("mock").with_error("down"), dir.path());

        let report = pipeline.process(b"cargo build --release".to_vec(), "notes.txt").await;

        assert!(report.success);
        assert_eq!(report.category, Some(Category::Engineering));
    }
}
