//! Classification cache repositories

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use super::JsonFileStore;
use crate::domain::DomainError;
use crate::domain::classification::{
    CachedClassification, ClassificationCacheRepository, ClassificationCacheSnapshot,
};

/// Cache persisted as one JSON object keyed by normalized query
#[derive(Debug)]
pub struct JsonFileClassificationCache {
    store: JsonFileStore<ClassificationCacheSnapshot>,
}

impl JsonFileClassificationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }
}

#[async_trait]
impl ClassificationCacheRepository for JsonFileClassificationCache {
    async fn snapshot(&self) -> Result<ClassificationCacheSnapshot, DomainError> {
        self.store.load().await
    }

    async fn insert(&self, key: String, entry: CachedClassification) -> Result<(), DomainError> {
        self.store
            .update(move |cache| {
                cache.insert(key, entry);
            })
            .await
    }
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct InMemoryClassificationCache {
    entries: RwLock<ClassificationCacheSnapshot>,
}

impl InMemoryClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache pre-populated with entries
    pub fn with_entries(entries: impl IntoIterator<Item = (String, CachedClassification)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ClassificationCacheRepository for InMemoryClassificationCache {
    async fn snapshot(&self) -> Result<ClassificationCacheSnapshot, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }

    async fn get(&self, key: &str) -> Result<Option<CachedClassification>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    async fn insert(&self, key: String, entry: CachedClassification) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key, entry);
        Ok(())
    }
}
