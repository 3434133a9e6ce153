//! Response memory repositories

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use super::JsonFileStore;
use crate::domain::DomainError;
use crate::domain::memory::{MemoryEntry, ResponseMemoryRepository};

/// Memory persisted as a JSON array in insertion order
#[derive(Debug)]
pub struct JsonFileResponseMemory {
    store: JsonFileStore<Vec<MemoryEntry>>,
}

impl JsonFileResponseMemory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }
}

#[async_trait]
impl ResponseMemoryRepository for JsonFileResponseMemory {
    async fn list(&self) -> Result<Vec<MemoryEntry>, DomainError> {
        self.store.load().await
    }

    async fn append(&self, entry: MemoryEntry) -> Result<(), DomainError> {
        self.store.update(move |entries| entries.push(entry)).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryResponseMemory {
    entries: RwLock<Vec<MemoryEntry>>,
}

impl InMemoryResponseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<MemoryEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl ResponseMemoryRepository for InMemoryResponseMemory {
    async fn list(&self) -> Result<Vec<MemoryEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }

    async fn append(&self, entry: MemoryEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_file_memory_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.json");
        let memory = JsonFileResponseMemory::new(&path);

        memory.append(MemoryEntry::new("first", "one", vec![1.0])).await.unwrap();
        memory.append(MemoryEntry::new("second", "two", vec![0.0])).await.unwrap();

        let entries = JsonFileResponseMemory::new(&path).list().await.unwrap();
        let queries: Vec<&str> = entries.iter().map(|e| e.query.as_str()).collect();

        assert_eq!(queries, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let memory = Arc::new(JsonFileResponseMemory::new(dir.path().join("embeddings.json")));

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let memory = Arc::clone(&memory);
                tokio::spawn(async move {
                    memory
                        .append(MemoryEntry::new(format!("q{}", i), "r", vec![i as f32]))
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(memory.len().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_in_memory_append() {
        let memory = InMemoryResponseMemory::new();

        memory.append(MemoryEntry::new("q", "r", vec![1.0])).await.unwrap();

        assert_eq!(memory.list().await.unwrap()[0].response, "r");
    }
}
