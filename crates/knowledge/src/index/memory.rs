//! In-memory vector index.
//!
//! Backs tests and ephemeral sessions. Can be flipped into a failing state
//! to exercise degraded-mode handling without a real backend outage.

use crate::index::{cosine_similarity, rank_results, Metric, VectorIndex};
use crate::types::{IndexStats, Segment};
use echomind_core::{AppError, AppResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    segments: Vec<Segment>,
    schema: Option<(usize, Metric)>,
}

/// In-memory vector index.
#[derive(Default)]
pub struct MemoryIndex {
    state: Mutex<MemoryState>,
    fail: AtomicBool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `IndexUnavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::IndexUnavailable(
                "Memory index set to fail".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::IndexUnavailable("Index state poisoned".to_string()))
    }
}

impl VectorIndex for MemoryIndex {
    fn ensure_schema(&self, dimension: usize, metric: Metric) -> AppResult<()> {
        self.check_available()?;
        let mut state = self.lock()?;

        if let Some((existing_dim, existing_metric)) = state.schema {
            if existing_dim != dimension || existing_metric != metric {
                return Err(AppError::SchemaConflict(format!(
                    "Index holds {} dimensions with {} metric; requested {} with {}",
                    existing_dim,
                    existing_metric.as_str(),
                    dimension,
                    metric.as_str()
                )));
            }
            return Ok(());
        }

        state.schema = Some((dimension, metric));
        Ok(())
    }

    fn upsert_batch(&self, segments: &[Segment]) -> AppResult<()> {
        self.check_available()?;
        let mut state = self.lock()?;

        let (dimension, _) = state.schema.ok_or_else(|| {
            AppError::IndexUnavailable("Index schema not initialized".to_string())
        })?;

        // Validate the whole batch before touching stored state
        for segment in segments {
            if segment.vector.len() != dimension {
                return Err(AppError::SchemaConflict(format!(
                    "Segment {} has {} dimensions, index expects {}",
                    segment.id,
                    segment.vector.len(),
                    dimension
                )));
            }
        }

        for segment in segments {
            if let Some(existing) = state.segments.iter_mut().find(|s| s.id == segment.id) {
                *existing = segment.clone();
            } else {
                state.segments.push(segment.clone());
            }
        }

        Ok(())
    }

    fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<(Segment, f32)>> {
        self.check_available()?;
        let state = self.lock()?;

        if let Some((dimension, _)) = state.schema {
            if vector.len() != dimension {
                return Err(AppError::InvalidInput(format!(
                    "Query vector has {} dimensions, index expects {}",
                    vector.len(),
                    dimension
                )));
            }
        }

        let mut results: Vec<(Segment, f32)> = state
            .segments
            .iter()
            .map(|segment| {
                let score = cosine_similarity(vector, &segment.vector);
                (segment.clone(), score)
            })
            .collect();

        rank_results(&mut results, top_k);
        Ok(results)
    }

    fn stats(&self) -> AppResult<IndexStats> {
        self.check_available()?;
        let state = self.lock()?;

        let sources: HashSet<&str> = state
            .segments
            .iter()
            .map(|s| s.source_id.as_str())
            .collect();

        Ok(IndexStats {
            sources: sources.len() as u32,
            segments: state.segments.len() as u32,
            dimension: state.schema.map(|(d, _)| d),
        })
    }

    fn reset(&self) -> AppResult<()> {
        self.check_available()?;
        let mut state = self.lock()?;
        state.segments.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(source: &str, ordinal: u32, text: &str, vector: Vec<f32>) -> Segment {
        let mut s = Segment::new(source, ordinal, text);
        s.vector = vector;
        s
    }

    #[test]
    fn test_upsert_and_query() {
        let index = MemoryIndex::new();
        index.ensure_schema(2, Metric::Cosine).unwrap();

        index
            .upsert_batch(&[
                segment("a.txt", 0, "north", vec![0.0, 1.0]),
                segment("a.txt", 1, "east", vec![1.0, 0.0]),
            ])
            .unwrap();

        let results = index.query(&[0.9, 0.1], 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.text, "east");
    }

    #[test]
    fn test_failing_mode() {
        let index = MemoryIndex::new();
        index.ensure_schema(2, Metric::Cosine).unwrap();
        index.set_failing(true);

        let err = index.query(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, AppError::IndexUnavailable(_)));

        index.set_failing(false);
        assert!(index.query(&[1.0, 0.0], 1).is_ok());
    }

    #[test]
    fn test_schema_conflict() {
        let index = MemoryIndex::new();
        index.ensure_schema(2, Metric::Cosine).unwrap();
        let err = index.ensure_schema(3, Metric::Cosine).unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict(_)));
    }

    #[test]
    fn test_batch_rejected_atomically() {
        let index = MemoryIndex::new();
        index.ensure_schema(2, Metric::Cosine).unwrap();

        let err = index
            .upsert_batch(&[
                segment("a.txt", 0, "good", vec![1.0, 0.0]),
                segment("a.txt", 1, "bad", vec![1.0, 0.0, 0.0]),
            ])
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict(_)));
        assert_eq!(index.stats().unwrap().segments, 0);
    }
}
