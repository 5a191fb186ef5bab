//! Brute-force in-memory vector index

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::cosine_similarity;
use crate::domain::{DistanceMetric, DomainError, VectorHit, VectorIndex, VectorPoint};

#[derive(Debug)]
struct Collection {
    dimension: usize,
    points: Vec<VectorPoint>,
}

/// Cosine-similarity index kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points in `name`, if the collection exists
    pub async fn len(&self, name: &str) -> Option<usize> {
        self.collections
            .read()
            .await
            .get(name)
            .map(|c| c.points.len())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.collections.read().await.contains_key(name))
    }

    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), DomainError> {
        if metric != DistanceMetric::Cosine {
            return Err(DomainError::vector_index(
                "In-memory index only supports cosine distance",
            ));
        }

        self.collections
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Collection {
                dimension,
                points: Vec::new(),
            });

        Ok(())
    }

    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> Result<(), DomainError> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| DomainError::vector_index(format!("Collection '{}' not found", name)))?;

        for point in points {
            if point.vector.len() != collection.dimension {
                return Err(DomainError::vector_index(format!(
                    "Vector dimension {} does not match collection dimension {}",
                    point.vector.len(),
                    collection.dimension
                )));
            }

            match collection.points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => collection.points.push(point),
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<VectorHit>, DomainError> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(name)
            .ok_or_else(|| DomainError::vector_index(format!("Collection '{}' not found", name)))?;

        let mut hits: Vec<VectorHit> = collection
            .points
            .iter()
            .map(|p| VectorHit {
                id: p.id.clone(),
                score: cosine_similarity(&vector, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);

        Ok(hits)
    }
}
