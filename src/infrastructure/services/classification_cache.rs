//! Classification cache lookups: exact key first, then nearest embedding

use std::sync::Arc;

use tracing::debug;

use super::TextEmbedder;
use crate::domain::classification::{
    CachedClassification, ClassificationCacheRepository, ContextLabel,
};
use crate::domain::similarity::{best_match, meets_threshold};
use crate::domain::{DomainError, Vector};

pub const DEFAULT_CACHE_SIMILARITY_THRESHOLD: f32 = 0.88;

/// Cached label found through embedding similarity
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub key: String,
    pub label: ContextLabel,
    pub score: f32,
}

/// Outcome of a fuzzy lookup
///
/// `embedding` is the query vector when one was computed, so the caller can
/// record a new entry without embedding the query again.
#[derive(Debug, Clone, Default)]
pub struct FuzzyLookup {
    pub matched: Option<FuzzyMatch>,
    pub best_score: Option<f32>,
    pub embedding: Option<Vector>,
}

#[derive(Debug, Clone)]
pub struct ClassificationCache {
    repository: Arc<dyn ClassificationCacheRepository>,
    embedder: TextEmbedder,
    threshold: f32,
}

impl ClassificationCache {
    pub fn new(repository: Arc<dyn ClassificationCacheRepository>, embedder: TextEmbedder) -> Self {
        Self::with_threshold(repository, embedder, DEFAULT_CACHE_SIMILARITY_THRESHOLD)
    }

    pub fn with_threshold(
        repository: Arc<dyn ClassificationCacheRepository>,
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

    pub fn embedder(&self) -> &TextEmbedder {
        &self.embedder
    }

    /// Label stored under exactly this normalized key
    pub async fn lookup_exact(&self, key: &str) -> Result<Option<ContextLabel>, DomainError> {
        Ok(self
            .repository
            .get(key)
            .await?
            .map(|entry| entry.label()))
    }

    /// Label of the most similar cached query, if it clears the threshold
    ///
    /// Entries without an embedding are not candidates. With no candidates the
    /// query is not embedded at all.
    pub async fn lookup_fuzzy(&self, key: &str) -> Result<FuzzyLookup, DomainError> {
        let snapshot = self.repository.snapshot().await?;

        if !snapshot.values().any(|entry| entry.embedding().is_some()) {
            return Ok(FuzzyLookup::default());
        }

        let embedding = self.embedder.embed(key).await?;

        let candidates = snapshot
            .iter()
            .filter_map(|(cached_key, entry)| entry.embedding().map(|v| ((cached_key, entry), v)));

        let best = best_match(&embedding, candidates);
        let best_score = best.as_ref().map(|b| b.score);

        let matched = best
            .filter(|b| meets_threshold(b.score, self.threshold))
            .map(|b| {
                let (cached_key, entry) = b.key;
                FuzzyMatch {
                    key: cached_key.clone(),
                    label: entry.label(),
                    score: b.score,
                }
            });

        match &matched {
            Some(m) => debug!(matched = %m.key, score = m.score, "Classification cache fuzzy hit"),
            None => debug!(best_score = ?best_score, "Classification cache fuzzy miss"),
        }

        Ok(FuzzyLookup {
            matched,
            best_score,
            embedding: Some(embedding),
        })
    }

    /// Insert or overwrite the entry for `key` and persist the cache
    pub async fn record(
        &self,
        key: impl Into<String>,
        label: ContextLabel,
        embedding: Vector,
    ) -> Result<(), DomainError> {
        self.repository
            .insert(key.into(), CachedClassification::new(label, embedding))
            .await
    }
}
