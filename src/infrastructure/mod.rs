//! Infrastructure layer - Implementations of domain traits

pub mod desk;
pub mod embedding;
pub mod guardrail;
pub mod ingestion;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod routing;
pub mod specialists;
pub mod vector;

pub use desk::{DeskReply, KnowledgeDesk, ReplyKind};
