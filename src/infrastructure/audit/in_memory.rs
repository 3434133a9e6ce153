use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::audit::{AuditLog, ClassificationLogEntry};

/// Process-local audit log
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<ClassificationLogEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, entry: &ClassificationLogEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.push(entry.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<ClassificationLogEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.clear();
        Ok(())
    }

    async fn check(&self) -> Result<(), DomainError> {
        self.entries
            .read()
            .map(|_| ())
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }
}
