//! In-memory vector store and similarity retrieval
//!
//! The store is an ordered collection of embedded fragments, built once
//! per session from a document sequence and read-only afterwards.
//! Retrieval is an exhaustive dot-product scan, acceptable at the
//! design's target scale of thousands of fragments.

use crate::chunk::chunk;
use crate::config::ChunkConfig;
use crate::embed::{euclidean_norm, Embedder};
use crate::error::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Largest tolerated deviation from unit length for stored vectors
pub const NORM_TOLERANCE: f64 = 1e-5;

/// A source document handed to the build phase.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// An embedded fragment of a source document.
///
/// Construction validates the vector: its length must match the
/// embedding dimension and its Euclidean norm must be 1 within
/// [`NORM_TOLERANCE`].
#[derive(Debug, Clone)]
pub struct Fragment {
    source_id: String,
    part_index: usize,
    text: String,
    vector: Vec<f32>,
}

impl Fragment {
    pub fn new(
        source_id: String,
        part_index: usize,
        text: String,
        vector: Vec<f32>,
        dimension: usize,
    ) -> Result<Self> {
        if vector.len() != dimension {
            return Err(Error::Embedding(format!(
                "fragment vector has {} components, expected {}",
                vector.len(),
                dimension
            )));
        }

        let norm = euclidean_norm(&vector);
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(Error::Embedding(format!(
                "fragment vector norm {} is not unit length",
                norm
            )));
        }

        Ok(Self {
            source_id,
            part_index,
            text,
            vector,
        })
    }

    /// Identifier of the source document
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// 0-based position within the source document's chunk sequence
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }
}

/// A retrieval hit: one stored fragment and its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredFragment {
    pub source_id: String,
    pub part_index: usize,
    pub text: String,
    pub score: f32,
}

/// Ordered, read-only collection of embedded fragments.
pub struct VectorStore {
    fragments: Vec<Fragment>,
    dimension: usize,
}

impl VectorStore {
    /// Chunk and embed every document, strictly in input order.
    ///
    /// One embedding batch per document; fragment order within the store
    /// is document arrival order then part index, reproducible for
    /// identical input. A document yielding no fragments contributes
    /// nothing. A non-retryable embedding failure aborts the whole
    /// build; there is no partial-index recovery.
    pub async fn build(
        embedder: &dyn Embedder,
        documents: &[Document],
        config: &ChunkConfig,
    ) -> Result<Self> {
        let mut fragments = Vec::new();

        for document in documents {
            let parts = chunk(&document.text, config.max_chars);
            if parts.is_empty() {
                debug!("Document '{}' produced no fragments", document.id);
                continue;
            }

            let vectors = embedder.embed(&parts).await?;
            for (part_index, (text, vector)) in parts.into_iter().zip(vectors).enumerate() {
                fragments.push(Fragment::new(
                    document.id.clone(),
                    part_index,
                    text,
                    vector,
                    embedder.dimension(),
                )?);
            }
            debug!("Indexed '{}'", document.id);
        }

        info!("Vector store built with {} fragments", fragments.len());
        Ok(Self {
            fragments,
            dimension: embedder.dimension(),
        })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Exhaustive top-k retrieval by dot product.
    ///
    /// Scores are valid cosine similarities because stored and query
    /// vectors are unit length. Returns `min(k, len)` hits in descending
    /// score order; equal scores order by higher original index first
    /// (stable ascending sort, then reversed).
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredFragment> {
        if k == 0 || self.fragments.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| (index, dot(fragment.vector(), query)))
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.reverse();
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(index, score)| {
                let fragment = &self.fragments[index];
                ScoredFragment {
                    source_id: fragment.source_id.clone(),
                    part_index: fragment.part_index,
                    text: fragment.text.clone(),
                    score,
                }
            })
            .collect()
    }
}

/// Dot product accumulated in f64 for a stable ranking.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum::<f64>() as f32
}
