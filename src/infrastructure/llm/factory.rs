use std::sync::Arc;

use super::AnthropicProvider;
use super::http_client::HttpClient;
use crate::config::LlmConfig;
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating the LLM provider
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the Anthropic provider from configuration
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            DomainError::configuration(format!(
                "Missing Anthropic API key: set llm.api_key or {}",
                LlmConfig::API_KEY_ENV
            ))
        })?;

        let http_client = HttpClient::from_timeout_secs(config.timeout_secs)?;
        let provider = AnthropicProvider::with_base_url(http_client, api_key, &config.base_url);

        Ok(Arc::new(provider))
    }
}
