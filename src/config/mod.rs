//! Configuration management for dossier
//!
//! Handles loading and validating configuration from TOML files. Every
//! field has a serde default, so a missing or partial config file still
//! yields a working configuration.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider connection configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,
}

/// Provider connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Environment variable name holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name/identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension (must match model)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Maximum retries on rate limiting before giving up
    #[serde(default = "default_embedding_max_retries")]
    pub max_retries: usize,

    /// Base backoff delay in milliseconds, doubled per retry
    #[serde(default = "default_embedding_backoff_ms")]
    pub backoff_base_ms: u64,
}

/// Chat completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model name/identifier
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per fragment
    #[serde(default = "default_chunk_max_chars")]
    pub max_chars: usize,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default number of fragments to ground an answer on
    #[serde(default = "default_query_k")]
    pub default_k: usize,

    /// Response language
    #[serde(default = "default_query_language")]
    pub language: String,

    /// Wording used when the context does not contain the answer
    #[serde(default = "default_not_found")]
    pub not_found: String,

    /// Wording used when the provider returns an empty completion
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            max_retries: default_embedding_max_retries(),
            backoff_base_ms: default_embedding_backoff_ms(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: default_chat_temperature(),
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_k: default_query_k(),
            language: default_query_language(),
            not_found: default_not_found(),
            fallback: default_fallback(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk.max_chars == 0 {
            return Err(Error::Config(
                "chunk.max_chars must be positive".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(Error::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }

        if self.query.default_k == 0 {
            return Err(Error::Config(
                "query.default_k must be at least 1".to_string(),
            ));
        }

        if self.chat.temperature < 0.0 || self.chat.temperature > 2.0 {
            return Err(Error::Config(
                "chat.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(Error::Config(
                "provider.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
