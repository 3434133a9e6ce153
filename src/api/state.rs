//! Application state for shared services

use std::sync::Arc;

use crate::domain::{AuditLog, ClassificationCacheRepository, ResponseMemoryRepository};
use crate::infrastructure::services::ResponseResolver;
use crate::infrastructure::storage::Repositories;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<ResponseResolver>,
    pub audit_log: Arc<dyn AuditLog>,
    pub classification_cache: Arc<dyn ClassificationCacheRepository>,
    pub response_memory: Arc<dyn ResponseMemoryRepository>,
}

impl AppState {
    pub fn new(resolver: ResponseResolver, repositories: &Repositories) -> Self {
        Self {
            resolver: Arc::new(resolver),
            audit_log: repositories.audit_log.clone(),
            classification_cache: repositories.classification_cache.clone(),
            response_memory: repositories.response_memory.clone(),
        }
    }
}
