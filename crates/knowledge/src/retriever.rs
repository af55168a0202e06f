//! Query-time retrieval over the vector index.
//!
//! Couples an embedding provider with a vector index and applies the
//! degraded-mode policy: an unreachable index downgrades to an empty
//! result set instead of failing the whole request, while an embedding
//! failure always propagates.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use echomind_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One retrieved segment with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Segment text
    pub text: String,

    /// Originating document
    pub source_id: String,

    /// Position of the segment within its source
    pub ordinal: u32,

    /// Similarity score (cosine, higher is closer)
    pub score: f32,
}

impl RetrievalResult {
    /// Provenance label shown alongside the answer.
    pub fn citation(&self) -> String {
        format!("From: {}, Chunk: {}", self.source_id, self.ordinal)
    }
}

/// Outcome of one retrieval attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieval {
    /// Retrieved segments, best first
    pub results: Vec<RetrievalResult>,

    /// True when the index was unreachable and results were skipped
    pub degraded: bool,
}

impl Retrieval {
    /// A retrieval that found nothing because the index was down.
    pub fn degraded() -> Self {
        Self {
            results: Vec::new(),
            degraded: true,
        }
    }
}

/// Embeds queries and ranks segments from the index.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Retrieve the segments most similar to `query`.
    ///
    /// An empty result set from a healthy index is a normal outcome and is
    /// not marked degraded. Only `IndexUnavailable` triggers the degraded
    /// path; every other error propagates.
    pub async fn retrieve(&self, query: &str) -> AppResult<Retrieval> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("Query must not be empty".to_string()));
        }

        let vector = self.embedder.embed(query).await?;

        match self.index.query(&vector, self.top_k) {
            Ok(hits) => {
                let results = hits
                    .into_iter()
                    .map(|(segment, score)| RetrievalResult {
                        text: segment.text,
                        source_id: segment.source_id,
                        ordinal: segment.ordinal,
                        score,
                    })
                    .collect();
                Ok(Retrieval {
                    results,
                    degraded: false,
                })
            }
            Err(AppError::IndexUnavailable(msg)) => {
                tracing::warn!("Vector index unavailable, continuing degraded: {}", msg);
                Ok(Retrieval::degraded())
            }
            Err(e) => Err(e),
        }
    }
}
