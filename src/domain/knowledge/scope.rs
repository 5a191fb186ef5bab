//! Tenant scope and collection keys

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Category;

/// Tenant/user identifier partitioning uploaded knowledge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub const DEFAULT: &'static str = "default";

    /// Create a scope; blank identifiers collapse to the default scope
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();

        if trimmed.is_empty() {
            Self(Self::DEFAULT.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifies one domain collection: a `(scope, category)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    pub scope: Scope,
    pub category: Category,
}

impl CollectionKey {
    pub fn new(scope: Scope, category: Category) -> Self {
        Self { scope, category }
    }

    /// Vector collection name, e.g. `user_default_engineer_knowledge`
    pub fn collection_name(&self) -> String {
        format!("user_{}_{}", self.scope, self.category.collection_base())
    }
}
