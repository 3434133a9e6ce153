use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Anthropic settings shared by the classification oracle and generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Falls back to `ANTHROPIC_API_KEY`
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Cohere,
    OpenAi,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    /// Falls back to `COHERE_API_KEY` or `OPENAI_API_KEY`
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Provider default when unset
    pub model: Option<String>,
}

/// Locations of the persisted stores
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub classification_cache_file: String,
    pub response_memory_file: String,
    pub audit_log_file: String,
    pub transcript_file: String,
}

/// Fuzzy matching thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub cache_similarity_threshold: f32,
    pub memory_similarity_threshold: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20240620".to_string(),
            temperature: 0.0,
            max_tokens: 4096,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub const API_KEY_ENV: &'static str = "ANTHROPIC_API_KEY";

    /// Configured key, else the provider's conventional environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), Self::API_KEY_ENV)
    }
}

impl EmbeddingProviderKind {
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Cohere => "COHERE_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl EmbeddingConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), self.provider.api_key_env())
    }
}

fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            classification_cache_file: "classification_cache.json".to_string(),
            response_memory_file: "embeddings.json".to_string(),
            audit_log_file: "context_classification_log.jsonl".to_string(),
            transcript_file: "history.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn classification_cache_path(&self) -> PathBuf {
        self.data_dir.join(&self.classification_cache_file)
    }

    pub fn response_memory_path(&self) -> PathBuf {
        self.data_dir.join(&self.response_memory_file)
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.audit_log_file)
    }

    pub fn transcript_path(&self) -> PathBuf {
        self.data_dir.join(&self.transcript_file)
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            cache_similarity_threshold: 0.88,
            memory_similarity_threshold: 0.85,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
