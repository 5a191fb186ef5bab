//! Query router: classify, dispatch to the matching specialist

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    ClassificationResult, RouteTrace, RouterState, Scope, SpecialistAnswer, SpecialistError,
};
use crate::infrastructure::specialists::SpecialistSet;

use super::classifier::LlmClassifier;

/// One traversal of the routing graph
#[derive(Debug)]
pub struct RoutedQuery {
    pub classification: ClassificationResult,
    pub trace: RouteTrace,
    pub outcome: Result<SpecialistAnswer, SpecialistError>,
}

/// Routes each query through `classifier` to exactly one specialist
#[derive(Debug, Clone)]
pub struct QueryRouter {
    classifier: Arc<LlmClassifier>,
    specialists: SpecialistSet,
}

impl QueryRouter {
    pub fn new(classifier: Arc<LlmClassifier>, specialists: SpecialistSet) -> Self {
        Self {
            classifier,
            specialists,
        }
    }

    pub fn classifier(&self) -> &Arc<LlmClassifier> {
        &self.classifier
    }

    /// Classify `query` and let the chosen specialist answer it
    pub async fn route(&self, query: &str, scope: &Scope) -> RoutedQuery {
        let mut trace = RouteTrace::new();
        trace.advance(RouterState::Classify);

        let classification = self.classifier.classify_query(query).await;
        let state = RouterState::for_category(classification.category);
        trace.advance(state);

        info!(
            category = %classification.category,
            specialist = classification.specialist,
            scope = %scope,
            "Routing query"
        );

        let outcome = self
            .specialists
            .for_category(classification.category)
            .answer(query, scope)
            .await;

        trace.advance(RouterState::End);
        debug!(trace = %trace, "Route complete");

        RoutedQuery {
            classification,
            trace,
            outcome,
        }
    }
}
