//! Classification cache entries and repository trait

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ContextLabel;
use crate::domain::DomainError;
use crate::domain::similarity::Vector;

/// Cached verdict for one normalized query
///
/// Entries written by older tooling may lack an embedding. They still
/// answer exact lookups but are skipped by fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedClassification {
    pub in_context: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
}

impl CachedClassification {
    pub fn new(label: ContextLabel, embedding: Vector) -> Self {
        Self {
            in_context: label.is_in_context(),
            embedding: Some(embedding),
        }
    }

    pub fn label(&self) -> ContextLabel {
        ContextLabel::from_in_context(self.in_context)
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }
}

/// Whole cache keyed by normalized query, in key order
pub type ClassificationCacheSnapshot = BTreeMap<String, CachedClassification>;

/// Normalize a query into its cache key (trimmed, lower-cased)
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Persisted mapping from normalized query to cached verdict
#[async_trait]
pub trait ClassificationCacheRepository: Send + Sync + Debug {
    /// Load the whole cache
    async fn snapshot(&self) -> Result<ClassificationCacheSnapshot, DomainError>;

    /// Look up a single normalized key
    async fn get(&self, key: &str) -> Result<Option<CachedClassification>, DomainError> {
        Ok(self.snapshot().await?.remove(key))
    }

    /// Insert or overwrite one entry and persist the full cache
    async fn insert(&self, key: String, entry: CachedClassification) -> Result<(), DomainError>;

    /// Number of cached queries
    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.snapshot().await?.len())
    }
}
