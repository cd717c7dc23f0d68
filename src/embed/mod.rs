//! Embedding generation
//!
//! An abstraction over embedding backends:
//! - A trait so the engine and tests can substitute doubles
//! - An OpenAI-compatible HTTP implementation
//! - Unit normalization shared by every backend

mod openai;

pub use openai::OpenAiEmbedder;

use crate::error::{Error, Result};
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one unit-normalized vector per input, in
    /// input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Scale a raw vector to unit Euclidean length.
///
/// Similarity downstream is a plain dot product, which is only a cosine
/// similarity when every stored and query vector is unit length. A
/// zero-length vector violates the provider contract and is rejected.
pub fn normalize(mut vector: Vec<f32>) -> Result<Vec<f32>> {
    let norm = euclidean_norm(&vector);
    if norm == 0.0 || !norm.is_finite() {
        return Err(Error::Embedding(
            "provider returned a zero-length embedding".to_string(),
        ));
    }

    for component in &mut vector {
        *component = (f64::from(*component) / norm) as f32;
    }
    Ok(vector)
}

/// Euclidean norm, accumulated in f64 so the unit-length check stays
/// accurate at high dimensions.
pub fn euclidean_norm(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|c| f64::from(*c) * f64::from(*c))
        .sum::<f64>()
        .sqrt()
}
