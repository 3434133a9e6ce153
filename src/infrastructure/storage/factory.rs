use std::sync::Arc;

use super::{
    InMemoryClassificationCache, InMemoryResponseMemory, InMemoryTranscript,
    JsonFileClassificationCache, JsonFileResponseMemory, JsonFileTranscript,
};
use crate::config::StorageConfig;
use crate::domain::{
    AuditLog, ClassificationCacheRepository, ResponseMemoryRepository, TranscriptRepository,
};
use crate::infrastructure::audit::{InMemoryAuditLog, JsonlAuditLog};

/// Every persisted store the application uses
#[derive(Debug, Clone)]
pub struct Repositories {
    pub classification_cache: Arc<dyn ClassificationCacheRepository>,
    pub response_memory: Arc<dyn ResponseMemoryRepository>,
    pub audit_log: Arc<dyn AuditLog>,
    pub transcript: Arc<dyn TranscriptRepository>,
}

/// Factory for creating repositories
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// File-backed stores under the configured data directory
    pub fn file(config: &StorageConfig) -> Repositories {
        tracing::debug!(data_dir = %config.data_dir.display(), "Using file storage");

        Repositories {
            classification_cache: Arc::new(JsonFileClassificationCache::new(
                config.classification_cache_path(),
            )),
            response_memory: Arc::new(JsonFileResponseMemory::new(config.response_memory_path())),
            audit_log: Arc::new(JsonlAuditLog::new(config.audit_log_path())),
            transcript: Arc::new(JsonFileTranscript::new(config.transcript_path())),
        }
    }

    /// Process-local stores
    pub fn in_memory() -> Repositories {
        Repositories {
            classification_cache: Arc::new(InMemoryClassificationCache::new()),
            response_memory: Arc::new(InMemoryResponseMemory::new()),
            audit_log: Arc::new(InMemoryAuditLog::new()),
            transcript: Arc::new(InMemoryTranscript::new()),
        }
    }
}
