//! OpenAI-compatible chat completion backend

use super::ChatModel;
use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::provider::OpenAiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Remote completion backend over the `/chat/completions` endpoint.
pub struct OpenAiChat {
    client: OpenAiClient,
    model: String,
    temperature: f32,
}

impl OpenAiChat {
    pub fn new(client: OpenAiClient, config: &ChatConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .http()
            .post(self.client.endpoint("/chat/completions"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_chat(server: &MockServer) -> OpenAiChat {
        let client =
            OpenAiClient::new("test-key", &server.uri(), Duration::from_secs(5)).unwrap();
        let config = ChatConfig {
            model: "test-chat".to_string(),
            temperature: 0.2,
        };
        OpenAiChat::new(client, &config)
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "model": "test-chat" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "content": "Grounded answer." } }
                ]
            })))
            .mount(&server)
            .await;

        let chat = test_chat(&server);
        let answer = chat.complete("system", "user").await.unwrap();

        assert_eq!(answer, "Grounded answer.");
    }

    #[tokio::test]
    async fn test_complete_empty_choices_yields_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let chat = test_chat(&server);
        let answer = chat.complete("system", "user").await.unwrap();

        assert!(answer.is_empty());
    }

    #[tokio::test]
    async fn test_complete_surfaces_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let chat = test_chat(&server);

        match chat.complete("system", "user").await {
            Err(Error::Provider { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Provider error, got {:?}", other.map(|_| ())),
        }
    }
}
