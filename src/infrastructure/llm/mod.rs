//! LLM provider implementations

mod anthropic;
mod factory;
mod http_client;

pub use anthropic::AnthropicProvider;
pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
