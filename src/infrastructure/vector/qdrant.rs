//! Qdrant-backed vector index

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config;
use qdrant_client::qdrant::{
    CreateCollection, Distance, PointId, PointStruct, ScoredPoint, SearchPoints, UpsertPoints,
    Value, VectorParams, VectorsConfig,
};
use qdrant_client::Qdrant;
use tracing::{debug, info};

use crate::domain::{DistanceMetric, DomainError, VectorHit, VectorIndex, VectorPoint};

/// Vector index stored in a Qdrant server
pub struct QdrantVectorIndex {
    client: Qdrant,
    url: String,
}

impl std::fmt::Debug for QdrantVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantVectorIndex")
            .field("url", &self.url)
            .finish()
    }
}

impl QdrantVectorIndex {
    /// Build a client for `url`
    pub fn connect(url: impl Into<String>, api_key: Option<String>) -> Result<Self, DomainError> {
        let url = url.into();
        let client = Qdrant::from_url(&url)
            .api_key(api_key)
            .build()
            .map_err(|e| DomainError::vector_index(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn distance(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Euclid => Distance::Euclid,
    }
}

fn string_value(value: &Value) -> String {
    match value.kind.as_ref() {
        Some(Kind::StringValue(s)) => s.clone(),
        Some(Kind::IntegerValue(i)) => i.to_string(),
        Some(Kind::DoubleValue(d)) => d.to_string(),
        Some(Kind::BoolValue(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn point_id(id: Option<PointId>) -> String {
    match id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

fn to_hit(point: ScoredPoint) -> VectorHit {
    let payload = point
        .payload
        .iter()
        .map(|(k, v)| (k.clone(), string_value(v)))
        .collect();

    VectorHit {
        id: point_id(point.id),
        score: point.score,
        payload,
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    async fn health_check(&self) -> Result<(), DomainError> {
        self.client
            .health_check()
            .await
            .map(|_| ())
            .map_err(|e| DomainError::vector_index(format!("Health check failed: {}", e)))
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| DomainError::vector_index(format!("Failed to list collections: {}", e)))?;

        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), DomainError> {
        info!(collection = %name, dimension, "Creating Qdrant collection");

        let create_collection = CreateCollection {
            collection_name: name.to_string(),
            vectors_config: Some(VectorsConfig {
                config: Some(Config::Params(VectorParams {
                    size: dimension as u64,
                    distance: distance(metric) as i32,
                    ..Default::default()
                })),
            }),
            ..Default::default()
        };

        self.client
            .create_collection(create_collection)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::vector_index(format!("Failed to create collection: {}", e)))
    }

    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> Result<(), DomainError> {
        let count = points.len();
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                let payload: HashMap<String, Value> = point
                    .payload
                    .into_iter()
                    .map(|(k, v)| {
                        (
                            k,
                            Value {
                                kind: Some(Kind::StringValue(v)),
                            },
                        )
                    })
                    .collect();

                PointStruct::new(point.id, point.vector, payload)
            })
            .collect();

        let upsert = UpsertPoints {
            collection_name: name.to_string(),
            points,
            ..Default::default()
        };

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| DomainError::vector_index(format!("Failed to upsert points: {}", e)))?;

        debug!(collection = %name, points = count, "Upserted points");
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<VectorHit>, DomainError> {
        let search_points = SearchPoints {
            collection_name: name.to_string(),
            vector,
            limit: top_k as u64,
            with_payload: Some(true.into()),
            ..Default::default()
        };

        let response = self
            .client
            .search_points(search_points)
            .await
            .map_err(|e| DomainError::vector_index(format!("Failed to search points: {}", e)))?;

        Ok(response.result.into_iter().map(to_hit).collect())
    }
}
