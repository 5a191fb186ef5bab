//! Read side of the knowledge store as seen by specialists

use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::Scope;
use crate::domain::{Category, DomainError};

/// Anything that can return rendered knowledge for a query
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeSource: Send + Sync + Debug {
    /// Rendered context for `query`, or one of the "nothing found" sentinels
    async fn search(
        &self,
        query: &str,
        category: Category,
        scope: &Scope,
        top_k: usize,
    ) -> Result<String, DomainError>;
}
