//! A provider bound to one model and its sampling settings

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::domain::llm::{FinishReason, LlmProvider, LlmRequest, Message};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_provider_call;

#[derive(Debug, Clone)]
pub struct ChatModel {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the messages and return the reply text
    ///
    /// `operation` labels the call in metrics (`classify`, `generate`).
    pub async fn complete(
        &self,
        operation: &'static str,
        messages: Vec<Message>,
    ) -> Result<String, DomainError> {
        let mut request = LlmRequest::builder()
            .messages(messages)
            .temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.max_tokens(max_tokens);
        }

        let provider = self.provider.provider_name();
        let started = Instant::now();
        let result = self.provider.chat(&self.model, request.build()).await;
        record_provider_call(provider, operation, started.elapsed(), result.is_ok());

        let response = result?;
        if let Some(ref usage) = response.usage {
            debug!(
                operation,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM call finished"
            );
        }
        if response.finish_reason == Some(FinishReason::Length) {
            warn!(operation, model = %self.model, "Reply truncated at max_tokens");
        }

        Ok(response.into_content())
    }
}
