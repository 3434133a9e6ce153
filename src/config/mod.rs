//! Configuration module

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, EmbeddingProviderKind, LlmConfig, LogFormat, LoggingConfig,
    MetricsConfig, ResolutionConfig, ServerConfig, StorageConfig,
};
