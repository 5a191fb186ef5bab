//! Retrieval-grounded specialist

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::knowledge::is_no_content;
use crate::domain::specialist::{grounded_prompt, parse_generated_answer, refusal_template};
use crate::domain::{
    Category, KnowledgeSource, LlmProvider, LlmRequest, Scope, Specialist, SpecialistAnswer,
    SpecialistError,
};

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Generation settings shared by every specialist
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_k: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Specialist answering only from knowledge stored in its category
#[derive(Debug, Clone)]
pub struct GroundedSpecialist {
    category: Category,
    source: Arc<dyn KnowledgeSource>,
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl GroundedSpecialist {
    pub fn new(
        category: Category,
        source: Arc<dyn KnowledgeSource>,
        provider: Arc<dyn LlmProvider>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            category,
            source,
            provider,
            settings,
        }
    }

    async fn retrieve(&self, query: &str, scope: &Scope) -> Option<String> {
        let result = self
            .source
            .search(query, self.category, scope, self.settings.top_k)
            .await;

        match result {
            Ok(context) if !is_no_content(&context, self.category) => Some(context),
            Ok(_) => None,
            Err(e) => {
                warn!(category = %self.category, scope = %scope, error = %e, "Knowledge search failed");
                None
            }
        }
    }
}

#[async_trait]
impl Specialist for GroundedSpecialist {
    fn category(&self) -> Category {
        self.category
    }

    async fn answer(&self, query: &str, scope: &Scope) -> Result<SpecialistAnswer, SpecialistError> {
        let Some(context) = self.retrieve(query, scope).await else {
            info!(category = %self.category, scope = %scope, "No relevant knowledge, refusing");
            return Ok(SpecialistAnswer::refusal(refusal_template(self.category, query)));
        };

        debug!(
            category = %self.category,
            context_chars = context.chars().count(),
            "Generating grounded answer"
        );

        let request = LlmRequest::builder()
            .user(grounded_prompt(self.category, query, &context))
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .json_object()
            .build();

        let response = self
            .provider
            .chat(&self.settings.model, request)
            .await
            .map_err(|e| SpecialistError::generation(self.category, e.to_string()))?;

        Ok(SpecialistAnswer::grounded(parse_generated_answer(
            response.content(),
        )))
    }
}
