//! Application services - the resolution pipeline

mod chat_model;
mod classification_cache;
mod context_classifier;
mod embedder;
mod response_memory;
mod response_resolver;

pub use chat_model::ChatModel;
pub use classification_cache::{
    ClassificationCache, DEFAULT_CACHE_SIMILARITY_THRESHOLD, FuzzyLookup, FuzzyMatch,
};
pub use context_classifier::ContextClassifier;
pub use embedder::TextEmbedder;
pub use response_memory::{
    DEFAULT_MEMORY_SIMILARITY_THRESHOLD, MemoryHit, MemoryLookup, ResponseMemory,
};
pub use response_resolver::{
    REFUSAL_MESSAGE, Resolution, ResolutionOrigin, ResponseResolver, annotate_memory_response,
};
