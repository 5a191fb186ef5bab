//! Query classification and routing

pub mod classifier;
pub mod router;

pub use classifier::LlmClassifier;
pub use router::{QueryRouter, RoutedQuery};
