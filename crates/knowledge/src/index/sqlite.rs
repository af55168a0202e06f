//! SQLite-backed vector index for knowledge segments.
//!
//! Vectors are stored as little-endian f32 blobs; similarity is computed
//! in-process over all rows. Fine for the corpus sizes a local assistant
//! works with.

use crate::index::{cosine_similarity, rank_results, Metric, VectorIndex};
use crate::types::{IndexStats, Segment};
use echomind_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Segments per write transaction.
const UPSERT_BATCH_SIZE: usize = 10;

/// SQLite vector index.
///
/// The connection is guarded by a mutex so the index can be shared as
/// `Arc<dyn VectorIndex>` across async tasks.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl SqliteIndex {
    /// Open (or create) an index at the given path.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::IndexUnavailable(format!("Failed to create index directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| {
            AppError::IndexUnavailable(format!("Failed to open SQLite index: {}", e))
        })?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS segments (
                id TEXT PRIMARY KEY,
                source_id TEXT NOT NULL,
                ordinal INTEGER NOT NULL,
                text TEXT NOT NULL,
                vector BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_segments_source ON segments(source_id);
            "#,
        )
        .map_err(|e| AppError::IndexUnavailable(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Opened SQLite index at {:?}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::IndexUnavailable("Index connection poisoned".to_string()))
    }

    fn declared_schema(conn: &Connection) -> AppResult<Option<(usize, Metric)>> {
        let dimension: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'dimension'",
                [],
                |row| row.get(0),
            )
            .ok();
        let metric: Option<String> = conn
            .query_row("SELECT value FROM meta WHERE key = 'metric'", [], |row| {
                row.get(0)
            })
            .ok();

        match (dimension, metric) {
            (Some(dimension), Some(metric)) => {
                let dimension: usize = dimension.parse().map_err(|_| {
                    AppError::IndexUnavailable("Corrupt dimension metadata".to_string())
                })?;
                let metric = Metric::parse(&metric).ok_or_else(|| {
                    AppError::IndexUnavailable(format!("Unknown metric in index: {}", metric))
                })?;
                Ok(Some((dimension, metric)))
            }
            _ => Ok(None),
        }
    }
}

impl VectorIndex for SqliteIndex {
    fn ensure_schema(&self, dimension: usize, metric: Metric) -> AppResult<()> {
        let conn = self.lock()?;

        if let Some((existing_dim, existing_metric)) = Self::declared_schema(&conn)? {
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

        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('dimension', ?1)",
            params![dimension.to_string()],
        )
        .map_err(|e| AppError::IndexUnavailable(format!("Failed to store schema: {}", e)))?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('metric', ?1)",
            params![metric.as_str()],
        )
        .map_err(|e| AppError::IndexUnavailable(format!("Failed to store schema: {}", e)))?;

        tracing::debug!(dimension, metric = metric.as_str(), "Declared index schema");
        Ok(())
    }

    fn upsert_batch(&self, segments: &[Segment]) -> AppResult<()> {
        let mut conn = self.lock()?;

        let (dimension, _) = Self::declared_schema(&conn)?.ok_or_else(|| {
            AppError::IndexUnavailable("Index schema not initialized".to_string())
        })?;

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

        // Write in small transactions so a failure loses at most one batch.
        for batch in segments.chunks(UPSERT_BATCH_SIZE) {
            let tx = conn.transaction().map_err(|e| {
                AppError::IndexUnavailable(format!("Failed to start transaction: {}", e))
            })?;

            for segment in batch {
                tx.execute(
                    "INSERT OR REPLACE INTO segments (id, source_id, ordinal, text, vector)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        segment.id,
                        segment.source_id,
                        segment.ordinal as i64,
                        segment.text,
                        vector_to_bytes(&segment.vector),
                    ],
                )
                .map_err(|e| {
                    AppError::IndexUnavailable(format!("Failed to upsert segment: {}", e))
                })?;
            }

            tx.commit().map_err(|e| {
                AppError::IndexUnavailable(format!("Failed to commit batch: {}", e))
            })?;
        }

        tracing::debug!("Upserted {} segments", segments.len());
        Ok(())
    }

    fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<(Segment, f32)>> {
        let conn = self.lock()?;

        if let Some((dimension, _)) = Self::declared_schema(&conn)? {
            if vector.len() != dimension {
                return Err(AppError::InvalidInput(format!(
                    "Query vector has {} dimensions, index expects {}",
                    vector.len(),
                    dimension
                )));
            }
        }

        let mut stmt = conn
            .prepare("SELECT id, source_id, ordinal, text, vector FROM segments")
            .map_err(|e| AppError::IndexUnavailable(format!("Failed to prepare query: {}", e)))?;

        let segments_iter = stmt
            .query_map([], |row| {
                let vector_bytes: Vec<u8> = row.get(4)?;
                let vector = bytes_to_vector(&vector_bytes)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

                Ok(Segment {
                    id: row.get(0)?,
                    source_id: row.get(1)?,
                    ordinal: row.get::<_, i64>(2)? as u32,
                    text: row.get(3)?,
                    vector,
                })
            })
            .map_err(|e| AppError::IndexUnavailable(format!("Failed to query segments: {}", e)))?;

        let mut results: Vec<(Segment, f32)> = Vec::new();
        for segment in segments_iter {
            let segment = segment.map_err(|e| {
                AppError::IndexUnavailable(format!("Failed to read segment row: {}", e))
            })?;
            let score = cosine_similarity(vector, &segment.vector);
            results.push((segment, score));
        }

        rank_results(&mut results, top_k);

        tracing::debug!("Retrieved {} segments (requested top-{})", results.len(), top_k);
        Ok(results)
    }

    fn stats(&self) -> AppResult<IndexStats> {
        let conn = self.lock()?;

        let sources: u32 = conn
            .query_row("SELECT COUNT(DISTINCT source_id) FROM segments", [], |row| {
                row.get::<_, i64>(0).map(|v| v as u32)
            })
            .map_err(|e| AppError::IndexUnavailable(format!("Failed to count sources: {}", e)))?;

        let segments: u32 = conn
            .query_row("SELECT COUNT(*) FROM segments", [], |row| {
                row.get::<_, i64>(0).map(|v| v as u32)
            })
            .map_err(|e| AppError::IndexUnavailable(format!("Failed to count segments: {}", e)))?;

        let dimension = Self::declared_schema(&conn)?.map(|(d, _)| d);

        Ok(IndexStats {
            sources,
            segments,
            dimension,
        })
    }

    fn reset(&self) -> AppResult<()> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM segments", [])
            .map_err(|e| AppError::IndexUnavailable(format!("Failed to delete segments: {}", e)))?;

        tracing::info!("Reset vector index");
        Ok(())
    }
}

/// Convert vector to bytes for storage.
fn vector_to_bytes(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert bytes back to vector.
fn bytes_to_vector(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::IndexUnavailable(
            "Invalid vector bytes length".to_string(),
        ));
    }

    let mut vector = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        vector.push(value);
    }

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn segment(source: &str, ordinal: u32, text: &str, vector: Vec<f32>) -> Segment {
        let mut s = Segment::new(source, ordinal, text);
        s.vector = vector;
        s
    }

    #[test]
    fn test_open_creates_tables() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.segments, 0);
        assert_eq!(stats.dimension, None);
    }

    #[test]
    fn test_upsert_and_query() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        index
            .upsert_batch(&[
                segment("a.txt", 0, "alpha", vec![1.0, 0.0, 0.0]),
                segment("a.txt", 1, "beta", vec![0.0, 1.0, 0.0]),
            ])
            .unwrap();

        let results = index.query(&[1.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.text, "alpha");
        assert!((results[0].1 - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_schema_conflict_on_dimension_change() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(384, Metric::Cosine).unwrap();

        // Same schema again is fine
        index.ensure_schema(384, Metric::Cosine).unwrap();

        let err = index.ensure_schema(768, Metric::Cosine).unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict(_)));
    }

    #[test]
    fn test_upsert_rejects_wrong_dimension() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        let err = index
            .upsert_batch(&[segment("a.txt", 0, "alpha", vec![1.0, 0.0])])
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict(_)));

        // Nothing was written
        assert_eq!(index.stats().unwrap().segments, 0);
    }

    #[test]
    fn test_query_rejects_wrong_dimension() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        let err = index.query(&[1.0, 0.0], 5).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_query_empty_index_is_ok() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        let results = index.query(&[1.0, 0.0, 0.0], 3).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        let mut seg = segment("a.txt", 0, "first", vec![1.0, 0.0, 0.0]);
        index.upsert_batch(std::slice::from_ref(&seg)).unwrap();

        seg.text = "second".to_string();
        index.upsert_batch(std::slice::from_ref(&seg)).unwrap();

        let results = index.query(&[1.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.text, "second");
    }

    #[test]
    fn test_stats_counts_distinct_sources() {
        let temp_file = NamedTempFile::new().unwrap();
        let index = SqliteIndex::open(temp_file.path()).unwrap();
        index.ensure_schema(3, Metric::Cosine).unwrap();

        index
            .upsert_batch(&[
                segment("a.txt", 0, "x", vec![1.0, 0.0, 0.0]),
                segment("a.txt", 1, "y", vec![0.0, 1.0, 0.0]),
                segment("b.txt", 0, "z", vec![0.0, 0.0, 1.0]),
            ])
            .unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.sources, 2);
        assert_eq!(stats.segments, 3);
        assert_eq!(stats.dimension, Some(3));
    }

    #[test]
    fn test_vector_bytes_roundtrip() {
        let vector = vec![0.1, -2.5, 3.75];
        let bytes = vector_to_bytes(&vector);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_vector(&bytes).unwrap(), vector);
    }

    #[test]
    fn test_schema_persists_across_open() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let index = SqliteIndex::open(temp_file.path()).unwrap();
            index.ensure_schema(3, Metric::Cosine).unwrap();
            index
                .upsert_batch(&[segment("a.txt", 0, "x", vec![1.0, 0.0, 0.0])])
                .unwrap();
        }

        let reopened = SqliteIndex::open(temp_file.path()).unwrap();
        let err = reopened.ensure_schema(4, Metric::Cosine).unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict(_)));
        assert_eq!(reopened.stats().unwrap().segments, 1);
    }
}
