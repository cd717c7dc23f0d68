//! Chat completion backends
//!
//! A trait over completion providers plus the OpenAI-compatible HTTP
//! implementation used to generate grounded answers.

mod openai;

pub use openai::OpenAiChat;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat-completion providers
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a system + user message pair, returning the completion text
    /// exactly as the provider produced it (possibly empty).
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}
