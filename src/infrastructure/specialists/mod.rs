//! Specialist implementations

mod grounded;

pub use grounded::{GenerationSettings, GroundedSpecialist, DEFAULT_TOP_K};

use std::sync::Arc;

use crate::domain::{Category, KnowledgeSource, LlmProvider, Specialist};

/// One specialist per category
#[derive(Debug, Clone)]
pub struct SpecialistSet {
    engineer: Arc<dyn Specialist>,
    doctor: Arc<dyn Specialist>,
    lawyer: Arc<dyn Specialist>,
}

impl SpecialistSet {
    pub fn new(
        engineer: Arc<dyn Specialist>,
        doctor: Arc<dyn Specialist>,
        lawyer: Arc<dyn Specialist>,
    ) -> Self {
        Self {
            engineer,
            doctor,
            lawyer,
        }
    }

    /// Grounded specialists sharing one knowledge source and provider
    pub fn grounded(
        source: Arc<dyn KnowledgeSource>,
        provider: Arc<dyn LlmProvider>,
        settings: GenerationSettings,
    ) -> Self {
        let build = |category| -> Arc<dyn Specialist> {
            Arc::new(GroundedSpecialist::new(
                category,
                source.clone(),
                provider.clone(),
                settings.clone(),
            ))
        };

        Self::new(
            build(Category::Engineering),
            build(Category::Medical),
            build(Category::Legal),
        )
    }

    pub fn for_category(&self, category: Category) -> &Arc<dyn Specialist> {
        match category {
            Category::Engineering => &self.engineer,
            Category::Medical => &self.doctor,
            Category::Legal => &self.lawyer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::MockKnowledgeSource;
    use crate::domain::llm::MockLlmProvider;

    #[test]
    fn test_each_category_has_its_specialist() {
        let set = SpecialistSet::grounded(
            Arc::new(MockKnowledgeSource::new()),
            Arc::new(MockLlmProvider::new("mock")),
            GenerationSettings::default(),
        );

        for category in Category::all() {
            assert_eq!(set.for_category(category).category(), category);
        }
    }
}
