//! Query orchestration
//!
//! Embeds a question, retrieves the most similar fragments, and grounds
//! a chat completion on them. Completion-side failures are rendered into
//! displayable text here, so callers always get something to show; only
//! query-embedding failures surface as errors.

use crate::config::QueryConfig;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::llm::ChatModel;
use crate::store::{ScoredFragment, VectorStore};
use serde::Serialize;
use tracing::debug;

/// A displayable answer plus the fragments that grounded it.
#[derive(Debug, Clone, Serialize)]
pub struct QaAnswer {
    pub question: String,
    pub answer: String,
    pub used: Vec<ScoredFragment>,
}

/// Drives retrieval and answer generation against a built store.
pub struct QaEngine {
    store: VectorStore,
    embedder: Box<dyn Embedder>,
    chat: Box<dyn ChatModel>,
    config: QueryConfig,
}

impl QaEngine {
    pub fn new(
        store: VectorStore,
        embedder: Box<dyn Embedder>,
        chat: Box<dyn ChatModel>,
        config: QueryConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            chat,
            config,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Answer a question using the top-k most similar fragments.
    ///
    /// When retrieval comes back empty there is nothing to ground on:
    /// the engine answers with the configured sentinel and never calls
    /// the completion provider.
    pub async fn retrieve_and_answer(&self, question: &str, k: usize) -> Result<QaAnswer> {
        let query = [question.to_string()];
        let query_vector = self
            .embedder
            .embed(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding returned for the question".to_string()))?;

        let used = self.store.search(&query_vector, k);
        debug!("Retrieved {} fragments for the question", used.len());

        if used.is_empty() {
            return Ok(QaAnswer {
                question: question.to_string(),
                answer: self.config.not_found.clone(),
                used,
            });
        }

        let system = self.system_prompt();
        let user = user_prompt(question, &used);

        let answer = match self.chat.complete(&system, &user).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    self.config.fallback.clone()
                } else {
                    trimmed.to_string()
                }
            }
            Err(Error::Provider { status, message }) => {
                format!("Provider error ({}): {}", status, message)
            }
            Err(other) => format!("Unexpected error: {}", other),
        };

        Ok(QaAnswer {
            question: question.to_string(),
            answer,
            used,
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are an assistant that answers questions about a collection of documents.\n\
             Instructions:\n\
             - Use ONLY the information in the provided CONTEXT\n\
             - Answer clearly and concisely in the language '{}'\n\
             - If the information is not in the context, reply exactly: {}\n\
             - Be specific and mention the source document id when relevant",
            self.config.language, self.config.not_found
        )
    }
}

fn user_prompt(question: &str, used: &[ScoredFragment]) -> String {
    format!("CONTEXT:\n{}\nQUESTION: {}", context_block(used), question)
}

/// Grounding block: one `[rank] fragment text` line per retrieved hit.
fn context_block(used: &[ScoredFragment]) -> String {
    let mut context = String::new();
    for (rank, fragment) in used.iter().enumerate() {
        context.push_str(&format!("[{}] {}\n", rank + 1, fragment.text));
    }
    context
}
