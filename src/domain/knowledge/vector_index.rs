//! Boundary to the external vector database

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Distance metric of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
    Dot,
    Euclid,
}

/// A vector with its string payload, ready for upsert
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, String>,
}

impl VectorPoint {
    /// Create a point with a random UUID id
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vector,
            payload: HashMap::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub id: String,
    pub score: f32,
    pub payload: HashMap<String, String>,
}

impl VectorHit {
    /// Payload `text` field, if present
    pub fn text(&self) -> Option<&str> {
        self.payload.get("text").map(String::as_str)
    }
}

/// Collection-based nearest-neighbour index
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<(), DomainError>;

    async fn collection_exists(&self, name: &str) -> Result<bool, DomainError>;

    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), DomainError>;

    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> Result<(), DomainError>;

    /// Nearest neighbours of `vector`, best first, at most `top_k`
    async fn search(
        &self,
        name: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<VectorHit>, DomainError>;
}
