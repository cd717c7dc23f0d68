//! OpenAI-compatible embedding backend

use super::{normalize, Embedder};
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::provider::OpenAiClient;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Remote embedding backend over the `/embeddings` endpoint.
///
/// Sends each batch in a single request. Rate limiting (HTTP 429) is
/// retried with capped exponential backoff up to `max_retries`; any
/// other failure status propagates immediately.
pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
    dimension: usize,
    max_retries: usize,
    backoff_base: Duration,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            dimension: config.dimension,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    fn retry_backoff(&self, attempt: usize) -> Duration {
        let capped = attempt.min(5) as u32;
        self.backoff_base * (1u32 << capped)
    }

    fn validate_batch(&self, embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
        if embeddings.len() != expected {
            return Err(Error::Embedding(format!(
                "provider returned {} embeddings for {} inputs",
                embeddings.len(),
                expected
            )));
        }

        if let Some(mismatch) = embeddings.iter().find(|v| v.len() != self.dimension) {
            return Err(Error::Embedding(format!(
                "embedding dimension mismatch for model '{}': expected {}, got {}",
                self.model,
                self.dimension,
                mismatch.len()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempt = 0usize;
        loop {
            let request = EmbeddingRequest {
                model: &self.model,
                input: texts,
            };
            let response = self
                .client
                .http()
                .post(self.client.endpoint("/embeddings"))
                .json(&request)
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.max_retries {
                    return Err(Error::RetriesExhausted {
                        attempts: attempt + 1,
                    });
                }
                attempt += 1;
                let delay = self.retry_backoff(attempt);
                warn!(
                    "Embedding provider rate limited, retrying in {:?} (attempt {}/{})",
                    delay, attempt, self.max_retries
                );
                tokio::time::sleep(delay).await;
                continue;
            }

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

            let mut parsed: EmbeddingResponse = response.json().await?;
            parsed.data.sort_by_key(|entry| entry.index);

            let raw: Vec<Vec<f32>> = parsed
                .data
                .into_iter()
                .map(|entry| entry.embedding)
                .collect();
            self.validate_batch(&raw, texts.len())?;

            return raw.into_iter().map(normalize).collect();
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::euclidean_norm;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_embedder(server: &MockServer, max_retries: usize) -> OpenAiEmbedder {
        let client =
            OpenAiClient::new("test-key", &server.uri(), Duration::from_secs(5)).unwrap();
        let config = EmbeddingConfig {
            model: "test-model".to_string(),
            dimension: 3,
            max_retries,
            backoff_base_ms: 1,
        };
        OpenAiEmbedder::new(client, &config)
    }

    fn success_body() -> serde_json::Value {
        // Out of index order on purpose: the client must sort
        json!({
            "data": [
                { "embedding": [0.0, 2.0, 0.0], "index": 1 },
                { "embedding": [3.0, 0.0, 4.0], "index": 0 },
            ]
        })
    }

    #[tokio::test]
    async fn test_embed_orders_by_index_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 0);
        let texts = vec!["first".to_string(), "second".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();

        assert_eq!(vectors.len(), 2);
        // index 0 entry came second in the payload
        assert!((vectors[0][0] - 0.6).abs() < 1e-6);
        assert!((vectors[0][2] - 0.8).abs() < 1e-6);
        assert!((vectors[1][1] - 1.0).abs() < 1e-6);
        for vector in &vectors {
            assert!((euclidean_norm(vector) - 1.0).abs() < 1e-5);
        }
    }

    #[tokio::test]
    async fn test_embed_retries_after_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 5);
        let texts = vec!["first".to_string(), "second".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();

        assert_eq!(vectors.len(), 2);
    }

    #[tokio::test]
    async fn test_embed_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 2);
        let texts = vec!["first".to_string()];

        match embedder.embed(&texts).await {
            Err(Error::RetriesExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_embed_propagates_non_retryable_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 5);
        let texts = vec!["first".to_string()];

        match embedder.embed(&texts).await {
            Err(Error::Provider { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Provider error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_embed_rejects_dimension_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [ { "embedding": [1.0, 0.0], "index": 0 } ]
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 0);
        let texts = vec!["first".to_string()];

        assert!(matches!(
            embedder.embed(&texts).await,
            Err(Error::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_rejects_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server, 0);
        let texts = vec!["only one".to_string()];

        assert!(matches!(
            embedder.embed(&texts).await,
            Err(Error::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_empty_batch_skips_request() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and fail the call

        let embedder = test_embedder(&server, 0);
        let vectors = embedder.embed(&[]).await.unwrap();

        assert!(vectors.is_empty());
    }
}
