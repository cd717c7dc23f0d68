//! Custom error types for dossier

use thiserror::Error;

/// Main error type for dossier operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Provider request failed ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Rate limited: retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for dossier
pub type Result<T> = std::result::Result<T, Error>;
