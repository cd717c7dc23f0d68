//! Default values for configuration

/// Default OpenAI-compatible API base URL
pub fn default_provider_base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

/// Default environment variable name for the provider API key
pub fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default request timeout in seconds
pub fn default_provider_timeout() -> u64 {
    60
}

/// Default embedding model
pub fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Default embedding dimension for text-embedding-3-small
pub fn default_embedding_dimension() -> usize {
    1536
}

/// Default maximum retries on provider rate limiting
pub fn default_embedding_max_retries() -> usize {
    5
}

/// Default base backoff delay in milliseconds (doubles per retry)
pub fn default_embedding_backoff_ms() -> u64 {
    500
}

/// Default chat completion model
pub fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default sampling temperature (low, for consistent phrasing)
pub fn default_chat_temperature() -> f32 {
    0.2
}

/// Default maximum characters per fragment
pub fn default_chunk_max_chars() -> usize {
    2000
}

/// Default number of fragments to ground an answer on
pub fn default_query_k() -> usize {
    5
}

/// Default response language
pub fn default_query_language() -> String {
    "es".to_string()
}

/// Default wording when the context does not contain the answer
pub fn default_not_found() -> String {
    "No encontrado en los documentos.".to_string()
}

/// Default wording when the provider returns an empty completion
pub fn default_fallback() -> String {
    "No se pudo generar una respuesta.".to_string()
}
