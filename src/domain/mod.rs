//! Domain layer - Core business logic and entities

pub mod category;
pub mod embedding;
pub mod error;
pub mod guardrail;
pub mod ingestion;
pub mod knowledge;
pub mod llm;
pub mod routing;
pub mod specialist;

pub use category::Category;
pub use embedding::{Embedding, EmbeddingProvider, EmbeddingRequest};
pub use error::DomainError;
pub use guardrail::{FailurePolicy, SafetyVerdict};
pub use ingestion::{
    ChunkingConfig, ExtractedDocument, ExtractedPage, IngestionReport, TextExtractor, TextSplitter,
};
pub use knowledge::{
    ChunkMetadata, CollectionKey, DistanceMetric, DocumentChunk, KnowledgeSource, Scope,
    StoredDocumentRecord, VectorHit, VectorIndex, VectorPoint,
};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmResponseFormat,
    Message, MessageRole, Usage,
};
pub use routing::{ClassificationResolution, ClassificationResult, RouteTrace, RouterState};
pub use specialist::{AgentResponse, Specialist, SpecialistAnswer, SpecialistError};
