//! Classification audit log - append-only record of every pipeline decision
//!
//! The resolution pipeline only writes to it; reads serve the `logs` CLI
//! command and the HTTP log endpoint.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::classification::{ClassificationSource, ContextLabel};

/// Where a logged decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSource {
    CacheExact,
    CacheFuzzy,
    LlmClassification,
    EmbeddingMemory,
    LlmGenerated,
}

impl From<ClassificationSource> for AuditSource {
    fn from(source: ClassificationSource) -> Self {
        match source {
            ClassificationSource::CacheExact => Self::CacheExact,
            ClassificationSource::CacheFuzzy => Self::CacheFuzzy,
            ClassificationSource::LlmClassification => Self::LlmClassification,
        }
    }
}

/// What kind of response the decision leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    MemoryExact,
    MemoryFuzzy,
    LlmClassified,
    LlmGenerated,
}

/// One line of the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLogEntry {
    pub timestamp: NaiveDateTime,
    pub query: String,
    pub classification: ContextLabel,
    pub source: AuditSource,
    pub score: Option<f64>,
    pub response_type: Option<ResponseType>,
}

impl ClassificationLogEntry {
    /// Create an entry stamped with the local time; scores keep 4 decimals
    pub fn new(
        query: impl Into<String>,
        classification: ContextLabel,
        source: AuditSource,
        score: Option<f32>,
        response_type: Option<ResponseType>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            query: query.into(),
            classification,
            source,
            score: score.map(round_score),
            response_type,
        }
    }
}

fn round_score(score: f32) -> f64 {
    (score as f64 * 10_000.0).round() / 10_000.0
}

/// Append-only audit sink
#[async_trait]
pub trait AuditLog: Send + Sync + Debug {
    async fn append(&self, entry: &ClassificationLogEntry) -> Result<(), DomainError>;

    /// Every record, oldest first
    async fn read_all(&self) -> Result<Vec<ClassificationLogEntry>, DomainError>;

    /// Drop every record
    async fn clear(&self) -> Result<(), DomainError>;

    /// Whether the log is reachable, without reading its records
    async fn check(&self) -> Result<(), DomainError>;
}
