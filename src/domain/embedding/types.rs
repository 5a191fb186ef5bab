//! Embedding request and vector types

use serde::{Deserialize, Serialize};

/// Input for embedding generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// Single text input
    Single(String),
    /// Batch of text inputs
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Get all inputs as a vector
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            EmbeddingInput::Single(s) => vec![s.as_str()],
            EmbeddingInput::Batch(v) => v.iter().map(|s| s.as_str()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Single(s) => s.is_empty(),
            EmbeddingInput::Batch(v) => v.is_empty(),
        }
    }
}

/// Request to embed one or more texts with a given model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: EmbeddingInput,
}

impl EmbeddingRequest {
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: EmbeddingInput::Single(text.into()),
        }
    }

    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input: EmbeddingInput::Batch(texts),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &EmbeddingInput {
        &self.input
    }

    pub fn inputs(&self) -> Vec<&str> {
        self.input.as_vec()
    }
}

/// A single embedding vector, tagged with its position in the request batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_input_batch() {
        let input = EmbeddingInput::Batch(vec!["hello".into(), "world".into()]);

        assert_eq!(input.len(), 2);
        assert!(!input.is_empty());
        assert_eq!(input.as_vec(), vec!["hello", "world"]);
    }

    #[test]
    fn test_embedding_request_single() {
        let request = EmbeddingRequest::single("all-MiniLM-L6-v2", "test");

        assert_eq!(request.model(), "all-MiniLM-L6-v2");
        assert_eq!(request.inputs(), vec!["test"]);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
