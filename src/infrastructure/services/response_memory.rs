//! Response memory: reuse answers to sufficiently similar past queries

use std::sync::Arc;

use tracing::debug;

use super::TextEmbedder;
use crate::domain::memory::{MemoryEntry, ResponseMemoryRepository};
use crate::domain::similarity::{best_match, meets_threshold};
use crate::domain::{DomainError, Vector};

pub const DEFAULT_MEMORY_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Remembered answer close enough to the query
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHit {
    pub query: String,
    pub response: String,
    pub score: f32,
}

/// Outcome of a memory lookup, carrying the query vector for a later append
#[derive(Debug, Clone)]
pub struct MemoryLookup {
    pub hit: Option<MemoryHit>,
    pub embedding: Vector,
}

#[derive(Debug, Clone)]
pub struct ResponseMemory {
    repository: Arc<dyn ResponseMemoryRepository>,
    embedder: TextEmbedder,
    threshold: f32,
}

impl ResponseMemory {
    pub fn new(repository: Arc<dyn ResponseMemoryRepository>, embedder: TextEmbedder) -> Self {
        Self::with_threshold(repository, embedder, DEFAULT_MEMORY_SIMILARITY_THRESHOLD)
    }

    pub fn with_threshold(
        repository: Arc<dyn ResponseMemoryRepository>,
        embedder: TextEmbedder,
        threshold: f32,
    ) -> Self {
        Self {
            repository,
            embedder,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Most similar remembered answer at or above the threshold
    pub async fn find_similar(&self, query: &str) -> Result<MemoryLookup, DomainError> {
        let embedding = self.embedder.embed(query).await?;
        let entries = self.repository.list().await?;

        let best = best_match(
            &embedding,
            entries.iter().map(|entry| (entry, entry.embedding.as_slice())),
        );

        let hit = best
            .filter(|b| meets_threshold(b.score, self.threshold))
            .map(|b| MemoryHit {
                query: b.key.query.clone(),
                response: b.key.response.clone(),
                score: b.score,
            });

        if let Some(ref hit) = hit {
            debug!(matched = %hit.query, score = hit.score, "Response memory hit");
        }

        Ok(MemoryLookup { hit, embedding })
    }

    /// Remember an answer; duplicates are kept
    pub async fn append(
        &self,
        query: impl Into<String>,
        response: impl Into<String>,
        embedding: Vector,
    ) -> Result<(), DomainError> {
        self.repository
            .append(MemoryEntry::new(query, response, embedding))
            .await
    }
}
