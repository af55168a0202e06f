//! Vector index abstraction for knowledge segments.
//!
//! Defines a trait for provider-agnostic vector storage and retrieval,
//! with SQLite and in-memory backends.

pub mod memory;
pub mod sqlite;

use crate::types::{IndexStats, Segment};
use echomind_core::AppResult;
use serde::{Deserialize, Serialize};

pub use memory::MemoryIndex;
pub use sqlite::SqliteIndex;

/// Similarity metric used by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cosine" => Some(Metric::Cosine),
            _ => None,
        }
    }
}

/// Trait for vector index backends.
///
/// Implementations must support:
/// - Declaring the schema (dimension and metric) before writes
/// - Upserting segments with embeddings
/// - Querying for the top-k nearest segments
/// - Collecting statistics
///
/// Backend failures surface as `AppError::IndexUnavailable`; a schema
/// mismatch against an existing index is `AppError::SchemaConflict`.
pub trait VectorIndex: Send + Sync {
    /// Declare the expected dimension and metric.
    ///
    /// Creates the schema on first use. If the index already holds a
    /// schema with a different dimension or metric, fails with
    /// `SchemaConflict` and leaves the existing data untouched.
    fn ensure_schema(&self, dimension: usize, metric: Metric) -> AppResult<()>;

    /// Insert or update a batch of segments.
    ///
    /// Each batch is applied atomically: either every segment in it is
    /// stored or none are.
    fn upsert_batch(&self, segments: &[Segment]) -> AppResult<()>;

    /// Query for the top-k segments nearest to the given vector.
    ///
    /// Results are ordered by descending score; ties break by ascending
    /// (source_id, ordinal) so ranking is deterministic. Returns fewer
    /// than `top_k` results when the index holds fewer segments; an empty
    /// result is not an error.
    fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<(Segment, f32)>>;

    /// Get statistics about the index.
    fn stats(&self) -> AppResult<IndexStats>;

    /// Remove all segments, keeping the schema.
    fn reset(&self) -> AppResult<()>;
}

/// Calculate cosine similarity between two vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Sort scored segments by descending score, breaking ties by ascending
/// (source_id, ordinal), then keep the top-k.
pub(crate) fn rank_results(results: &mut Vec<(Segment, f32)>, top_k: usize) {
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                (a.0.source_id.as_str(), a.0.ordinal).cmp(&(b.0.source_id.as_str(), b.0.ordinal))
            })
    });
    results.truncate(top_k);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![1.0, 0.0, 0.0];
        let d = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&c, &d) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_results_tie_break() {
        let seg = |source: &str, ordinal: u32| {
            let mut s = Segment::new(source, ordinal, "t");
            s.vector = vec![1.0];
            s
        };

        let mut results = vec![
            (seg("b.txt", 0), 0.5),
            (seg("a.txt", 1), 0.5),
            (seg("a.txt", 0), 0.5),
            (seg("c.txt", 0), 0.9),
        ];
        rank_results(&mut results, 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.source_id, "c.txt");
        assert_eq!(
            (results[1].0.source_id.as_str(), results[1].0.ordinal),
            ("a.txt", 0)
        );
        assert_eq!(
            (results[2].0.source_id.as_str(), results[2].0.ordinal),
            ("a.txt", 1)
        );
    }

    #[test]
    fn test_metric_roundtrip() {
        assert_eq!(Metric::parse("cosine"), Some(Metric::Cosine));
        assert_eq!(Metric::Cosine.as_str(), "cosine");
        assert_eq!(Metric::parse("dot"), None);
    }
}
