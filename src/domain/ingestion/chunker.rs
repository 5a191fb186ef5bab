//! Text splitting trait and configuration

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Configuration for chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::validation(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Trait for splitting text into chunk-sized pieces
pub trait TextSplitter: Send + Sync + Debug {
    /// Split text into non-empty pieces of at most `chunk_size` characters
    fn split(&self, text: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).validate().is_ok());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
    }
}
