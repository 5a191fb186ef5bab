//! Completion-backed category classifier

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::routing::{
    document_classification_prompt, query_classification_prompt, resolve_label,
};
use crate::domain::{
    Category, ClassificationResolution, ClassificationResult, LlmProvider, LlmRequest,
};

const CLASSIFICATION_MAX_TOKENS: u32 = 50;

/// Classifier shared by the query router and the ingestion pipeline
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// One deterministic JSON completion; `None` when the call fails
    async fn complete(&self, prompt: String) -> Option<String> {
        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(0.0)
            .max_tokens(CLASSIFICATION_MAX_TOKENS)
            .json_object()
            .build();

        match self.provider.chat(&self.model, request).await {
            Ok(response) => Some(response.content().to_string()),
            Err(e) => {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "Classification call failed"
                );
                None
            }
        }
    }

    /// Classify a user query; never fails
    pub async fn classify_query(&self, query: &str) -> ClassificationResult {
        let Some(raw) = self.complete(query_classification_prompt(query)).await else {
            info!(category = %Category::default(), "Classification unavailable, using default category");
            return ClassificationResult::fallback(query);
        };

        let (category, resolution) = resolve_label(&raw);

        match resolution {
            ClassificationResolution::Strict => {
                debug!(category = %category, "Query classified")
            }
            ClassificationResolution::Recovered => {
                info!(category = %category, raw = %raw, "Query category recovered from free text")
            }
            ClassificationResolution::Default => {
                warn!(category = %category, raw = %raw, "Unrecognised classification, using default category")
            }
        }

        ClassificationResult::new(query, category, resolution)
    }

    /// Classify a document from its filename and the start of its text
    ///
    /// Only an exact category name is accepted; anything else falls back to
    /// the default category.
    pub async fn classify_document(
        &self,
        filename: &str,
        text: &str,
        sample_chars: usize,
    ) -> (Category, ClassificationResolution) {
        let sample: String = text.chars().take(sample_chars).collect();

        let Some(raw) = self
            .complete(document_classification_prompt(filename, &sample))
            .await
        else {
            return (Category::default(), ClassificationResolution::Default);
        };

        match resolve_label(&raw) {
            (category, ClassificationResolution::Strict) => {
                debug!(filename, category = %category, "Document classified");
                (category, ClassificationResolution::Strict)
            }
            _ => {
                warn!(filename, raw = %raw, "Invalid document category, using default");
                (Category::default(), ClassificationResolution::Default)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponseFormat, MockLlmProvider};

    fn classifier(provider: MockLlmProvider) -> (LlmClassifier, Arc<MockLlmProvider>) {
        let provider = Arc::new(provider);
        (LlmClassifier::new(provider.clone(), "gpt-3.5-turbo"), provider)
    }

    #[tokio::test]
    async fn test_strict_query_classification() {
        let (classifier, provider) =
            classifier(MockLlmProvider::new("mock").with_reply(r#"{"category": "medical"}"#));

        let result = classifier.classify_query("How do I treat a sprained ankle?").await;

        assert_eq!(result.category, Category::Medical);
        assert_eq!(result.specialist, "doctor");
        assert_eq!(result.resolution, ClassificationResolution::Strict);

        let request = &provider.requests()[0];
        assert!(request.is_deterministic());
        assert_eq!(request.max_tokens, Some(50));
        assert_eq!(request.response_format, Some(LlmResponseFormat::JsonObject));
    }

    #[tokio::test]
    async fn test_malformed_json_defaults() {
        let (classifier, _) = classifier(MockLlmProvider::new("mock").with_reply("{{{"));

        let result = classifier.classify_query("anything").await;

        assert_eq!(result.category, Category::Engineering);
        assert_eq!(result.resolution, ClassificationResolution::Default);
    }

    #[tokio::test]
    async fn test_transport_failure_defaults() {
        let (classifier, _) = classifier(MockLlmProvider::new("mock").with_error("timeout"));

        let result = classifier.classify_query("Is my contract valid?").await;

        assert_eq!(result.category, Category::Engineering);
        assert_eq!(result.resolution, ClassificationResolution::Default);
    }

    #[tokio::test]
    async fn test_document_classification_is_strict() {
        let (classifier, provider) = classifier(
            MockLlmProvider::new("mock")
                .with_reply(r#"{"category": "legal"}"#)
                .with_reply(r#"{"category": "law"}"#),
        );

        let text = "x".repeat(5000);
        let first = classifier.classify_document("nda.pdf", &text, 2000).await;
        let second = classifier.classify_document("nda.pdf", &text, 2000).await;

        assert_eq!(first, (Category::Legal, ClassificationResolution::Strict));
        assert_eq!(second, (Category::Engineering, ClassificationResolution::Default));

        let prompt = provider.requests()[0].messages[0].content_text().to_string();
        assert!(prompt.contains("Document filename: nda.pdf"));
        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }
}
