//! Embedding provider implementations

mod cohere;
mod factory;
mod openai;

pub use cohere::CohereEmbeddingProvider;
pub use factory::EmbeddingProviderFactory;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
