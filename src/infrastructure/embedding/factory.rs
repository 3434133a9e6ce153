use std::sync::Arc;

use super::{CohereEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider};
use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::{DomainError, EmbeddingProvider};

/// Factory for creating the configured embedding provider
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            DomainError::configuration(format!(
                "Missing embedding API key: set embedding.api_key or {}",
                config.provider.api_key_env()
            ))
        })?;

        let http_client = HttpClient::new();

        let provider: Arc<dyn EmbeddingProvider> = match (config.provider, &config.base_url) {
            (EmbeddingProviderKind::Cohere, Some(url)) => Arc::new(
                CohereEmbeddingProvider::with_base_url(http_client, api_key, url),
            ),
            (EmbeddingProviderKind::Cohere, None) => {
                Arc::new(CohereEmbeddingProvider::new(http_client, api_key))
            }
            (EmbeddingProviderKind::OpenAi, Some(url)) => Arc::new(
                OpenAiEmbeddingProvider::with_base_url(http_client, api_key, url),
            ),
            (EmbeddingProviderKind::OpenAi, None) => {
                Arc::new(OpenAiEmbeddingProvider::new(http_client, api_key))
            }
        };

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cohere() {
        let config = EmbeddingConfig {
            api_key: Some("co-key".to_string()),
            ..EmbeddingConfig::default()
        };

        let provider = EmbeddingProviderFactory::create(&config).unwrap();

        assert_eq!(provider.provider_name(), "cohere");
        assert_eq!(provider.default_model(), "embed-english-v3.0");
    }

    #[test]
    fn test_create_openai_with_base_url() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAi,
            api_key: Some("sk-test".to_string()),
            base_url: Some("http://localhost:9999".to_string()),
            model: None,
        };

        let provider = EmbeddingProviderFactory::create(&config).unwrap();

        assert_eq!(provider.provider_name(), "openai");
    }
}
