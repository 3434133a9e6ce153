//! Interview Coach
//!
//! A career and interview coaching assistant that answers questions through a
//! tiered resolution pipeline:
//! - Context classification via exact cache, fuzzy embedding cache, then an LLM oracle
//! - Out-of-context refusal
//! - Embedding-based response memory before falling back to generation
//! - JSONL audit log of every decision

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{EmbeddingProvider, LlmProvider};
use infrastructure::{
    embedding::EmbeddingProviderFactory,
    llm::LlmProviderFactory,
    services::{
        ChatModel, ClassificationCache, ContextClassifier, ResponseMemory, ResponseResolver,
        TextEmbedder,
    },
    storage::{Repositories, StorageFactory},
};
use tracing::info;

/// The two external models the pipeline talks to
#[derive(Debug, Clone)]
pub struct Providers {
    pub llm: Arc<dyn LlmProvider>,
    pub embedding: Arc<dyn EmbeddingProvider>,
}

impl Providers {
    /// Build providers from configuration; fails when an API key is missing
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let llm = LlmProviderFactory::create(&config.llm)?;
        let embedding = EmbeddingProviderFactory::create(&config.embedding)?;

        info!(
            llm = llm.provider_name(),
            embedding = embedding.provider_name(),
            "Providers initialized"
        );

        Ok(Self { llm, embedding })
    }
}

/// Wire the resolution pipeline over the given stores and providers
///
/// The oracle and the generator share one LLM provider and model; the
/// classifier pins the oracle to temperature 0.
pub fn build_resolver(
    config: &AppConfig,
    repositories: &Repositories,
    providers: &Providers,
) -> ResponseResolver {
    let embedder = match config.embedding.model {
        Some(ref model) => TextEmbedder::new(providers.embedding.clone(), model),
        None => TextEmbedder::with_default_model(providers.embedding.clone()),
    };
    let chat_model = ChatModel::from_config(providers.llm.clone(), &config.llm);

    let cache = ClassificationCache::with_threshold(
        repositories.classification_cache.clone(),
        embedder.clone(),
        config.resolution.cache_similarity_threshold,
    );
    let classifier = ContextClassifier::new(cache, chat_model.clone(), repositories.audit_log.clone());

    let memory = ResponseMemory::with_threshold(
        repositories.response_memory.clone(),
        embedder,
        config.resolution.memory_similarity_threshold,
    );

    ResponseResolver::new(classifier, memory, chat_model, repositories.audit_log.clone())
}

/// Create the file-backed stores and providers named by the configuration
pub fn create_runtime(config: &AppConfig) -> anyhow::Result<(Repositories, ResponseResolver)> {
    let repositories = StorageFactory::file(&config.storage);
    let providers = Providers::from_config(config)?;
    let resolver = build_resolver(config, &repositories, &providers);

    Ok((repositories, resolver))
}

/// Create the application state with all services initialized
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let (repositories, resolver) = create_runtime(config)?;

    info!(
        data_dir = %config.storage.data_dir.display(),
        "Application state created"
    );

    Ok(AppState::new(resolver, &repositories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::infrastructure::services::ResolutionOrigin;

    #[tokio::test]
    async fn test_build_resolver_uses_configured_thresholds() {
        let mut config = AppConfig::default();
        // any non-identical vector falls below a threshold of 1.0
        config.resolution.memory_similarity_threshold = 1.0;

        let repositories = StorageFactory::in_memory();
        let providers = Providers {
            llm: Arc::new(
                MockLlmProvider::new("mock")
                    .with_reply("IN_CONTEXT")
                    .with_default_reply("Practice STAR stories."),
            ),
            embedding: Arc::new(
                MockEmbeddingProvider::new("mock", 2)
                    .with_vector("How do I answer behavioral questions?", vec![1.0, 0.0])
                    .with_vector("How to answer behavioural questions?", vec![0.99, 0.14]),
            ),
        };
        let resolver = build_resolver(&config, &repositories, &providers);

        resolver
            .resolve("How do I answer behavioral questions?", &[])
            .await
            .unwrap();
        let second = resolver
            .resolve("How to answer behavioural questions?", &[])
            .await
            .unwrap();

        assert_eq!(second.origin, ResolutionOrigin::Generated);
        assert_eq!(repositories.response_memory.len().await.unwrap(), 2);
    }
}
