//! Response memory domain - previously generated answers and their embeddings

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::similarity::Vector;

/// One remembered answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub query: String,
    pub response: String,
    pub embedding: Vector,
}

impl MemoryEntry {
    pub fn new(query: impl Into<String>, response: impl Into<String>, embedding: Vector) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            embedding,
        }
    }
}

/// Append-only, insertion-ordered store of remembered answers
#[async_trait]
pub trait ResponseMemoryRepository: Send + Sync + Debug {
    /// All entries in insertion order
    async fn list(&self) -> Result<Vec<MemoryEntry>, DomainError>;

    /// Append one entry and persist the full list
    async fn append(&self, entry: MemoryEntry) -> Result<(), DomainError>;

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
