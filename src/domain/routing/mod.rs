//! Query routing domain types
//!
//! Classification results, the three-tier label resolution, and the
//! router's state graph.

pub mod classification;
pub mod state;

pub use classification::{
    document_classification_prompt, query_classification_prompt, resolve_label,
    ClassificationResolution, ClassificationResult,
};
pub use state::{RouteTrace, RouterState};
