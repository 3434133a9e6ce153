//! Conversation transcript repositories

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use super::JsonFileStore;
use crate::domain::DomainError;
use crate::domain::conversation::{ChatTurn, TranscriptRepository};

/// Transcript persisted as a JSON array of tagged turns
#[derive(Debug)]
pub struct JsonFileTranscript {
    store: JsonFileStore<Vec<ChatTurn>>,
}

impl JsonFileTranscript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }
}

#[async_trait]
impl TranscriptRepository for JsonFileTranscript {
    async fn load(&self) -> Result<Option<Vec<ChatTurn>>, DomainError> {
        self.store.load_optional().await
    }

    async fn save(&self, turns: &[ChatTurn]) -> Result<(), DomainError> {
        self.store.save(&turns.to_vec()).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTranscript {
    turns: RwLock<Option<Vec<ChatTurn>>>,
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptRepository for InMemoryTranscript {
    async fn load(&self) -> Result<Option<Vec<ChatTurn>>, DomainError> {
        let turns = self.turns.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(turns.clone())
    }

    async fn save(&self, turns: &[ChatTurn]) -> Result<(), DomainError> {
        let mut stored = self.turns.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *stored = Some(turns.to_vec());
        Ok(())
    }
}
