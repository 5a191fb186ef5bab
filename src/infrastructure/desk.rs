//! Knowledge desk: the end-to-end ask and ingest operations

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::{AgentResponse, Category, IngestionReport, Scope};

use super::guardrail::SafetyGuardrail;
use super::ingestion::IngestionPipeline;
use super::knowledge::KnowledgeStore;
use super::routing::QueryRouter;

/// Pseudo-specialist reported for blocked input
pub const SAFETY_SPECIALIST: &str = "safety";

pub const STORE_FAILED: &str = "Failed to store document in knowledge base";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    AgentResponse,
    Error,
}

/// Caller-facing result of [`KnowledgeDesk::ask`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeskReply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub message: String,
    pub specialist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub original_query: String,
    pub grounded: bool,
    /// Route taken through the graph, e.g. `__start__ -> classifier -> doctor -> __end__`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Unix seconds
    pub timestamp: i64,
}

impl DeskReply {
    fn new(kind: ReplyKind, message: impl Into<String>, specialist: impl Into<String>, query: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            specialist: specialist.into(),
            category: None,
            original_query: query.to_string(),
            grounded: false,
            route: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    fn answered(response: AgentResponse, query: &str, route: String) -> Self {
        Self {
            category: Some(response.category),
            grounded: response.grounded,
            route: Some(route),
            ..Self::new(ReplyKind::AgentResponse, response.text, response.specialist, query)
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ReplyKind::Error
    }
}

/// Composes guardrail, router, store and ingestion pipeline
#[derive(Debug, Clone)]
pub struct KnowledgeDesk {
    guardrail: SafetyGuardrail,
    router: QueryRouter,
    store: Arc<KnowledgeStore>,
    pipeline: IngestionPipeline,
}

impl KnowledgeDesk {
    pub fn new(
        guardrail: SafetyGuardrail,
        router: QueryRouter,
        store: Arc<KnowledgeStore>,
        pipeline: IngestionPipeline,
    ) -> Self {
        Self {
            guardrail,
            router,
            store,
            pipeline,
        }
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Rehydrate the store from previously saved documents
    pub async fn restore(&self) -> usize {
        let splitter = self.pipeline.splitter();
        self.store
            .load_existing(splitter.as_ref(), self.pipeline.chunking())
            .await
    }

    /// Answer `query` from knowledge uploaded under `scope`
    pub async fn ask(&self, query: &str, scope: &Scope) -> DeskReply {
        let verdict = self.guardrail.check_input(query);
        if !verdict.safe {
            return DeskReply::new(
                ReplyKind::AgentResponse,
                verdict.message,
                SAFETY_SPECIALIST,
                query,
            );
        }

        let routed = self.router.route(query, scope).await;
        let category = routed.classification.category;

        match routed.outcome {
            Ok(answer) => {
                let text = self.guardrail.filter_response(&answer.text, category);
                let response = AgentResponse::new(category, answer, text);

                info!(
                    category = %category,
                    scope = %scope,
                    grounded = response.grounded,
                    "Query answered"
                );
                DeskReply::answered(response, query, routed.trace.to_string())
            }
            Err(e) => {
                error!(category = %category, error = %e, "Specialist failed");
                DeskReply {
                    category: Some(category),
                    route: Some(routed.trace.to_string()),
                    ..DeskReply::new(ReplyKind::Error, e.user_message(), category.specialist_id(), query)
                }
            }
        }
    }

    /// Process an upload and add its chunks to the store under `scope`
    pub async fn ingest(&self, bytes: Vec<u8>, filename: &str, scope: &Scope) -> IngestionReport {
        let report = self.pipeline.process(bytes, filename).await;

        let Some(category) = report.category.filter(|_| report.success) else {
            return report;
        };

        if !self.store.add_chunks(report.chunks.clone(), category, scope).await {
            warn!(source = filename, "Knowledge store rejected document");
            if let Some(path) = report.file_path.as_deref() {
                discard_saved_file(path).await;
            }
            return report.mark_failed(STORE_FAILED);
        }

        report
    }
}

/// Remove an upload that never made it into the metadata file
async fn discard_saved_file(path: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path, "Removed saved file of rejected document"),
        Err(e) => warn!(path, error = %e, "Failed to remove saved file of rejected document"),
    }
}
