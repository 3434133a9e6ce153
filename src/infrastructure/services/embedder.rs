//! Query embedding through the configured provider

use std::sync::Arc;
use std::time::Instant;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::{DomainError, Vector};
use crate::infrastructure::observability::record_provider_call;

/// Embeds one text at a time with a fixed model
///
/// No caching and no retry: every call reaches the provider and failures
/// propagate to the caller.
#[derive(Debug, Clone)]
pub struct TextEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
}

impl TextEmbedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Use the provider's default model
    pub fn with_default_model(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let model = provider.default_model();
        Self::new(provider, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn embed(&self, text: &str) -> Result<Vector, DomainError> {
        let provider = self.provider.provider_name();
        let started = Instant::now();

        let result = self
            .provider
            .embed(EmbeddingRequest::query(&self.model, text))
            .await;
        record_provider_call(provider, "embed", started.elapsed(), result.is_ok());

        result?
            .into_first_vector()
            .filter(|vector| !vector.is_empty())
            .ok_or_else(|| DomainError::provider(provider, "Embedding response contained no vector"))
    }
}
