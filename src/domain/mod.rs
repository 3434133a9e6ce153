//! Domain layer - Core business logic and entities

pub mod audit;
pub mod classification;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod memory;
pub mod similarity;

pub use audit::{AuditLog, AuditSource, ClassificationLogEntry, ResponseType};
pub use classification::{
    Classification, ClassificationCacheRepository, ClassificationSource, ContextLabel,
};
pub use conversation::{ChatTurn, TranscriptRepository};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use memory::{MemoryEntry, ResponseMemoryRepository};
pub use similarity::{BestMatch, Vector, best_match, cosine_similarity};
