//! Document ingestion: chunk, embed, and upsert into the index.

use crate::chunker::Chunker;
use crate::embeddings::EmbeddingProvider;
use crate::index::{Metric, VectorIndex};
use crate::types::{IngestStats, Segment};
use echomind_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Ingests text documents into a vector index.
pub struct Ingestor {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Ingestor {
    pub fn new(
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            index,
        }
    }

    /// Ingest every `.txt` file under `dir` (recursively).
    ///
    /// Declares the index schema from the embedder's dimensions before any
    /// write. Unreadable and empty files are skipped with a warning;
    /// embedding and index failures abort the run.
    pub async fn ingest_dir(&self, dir: &Path) -> AppResult<IngestStats> {
        if !dir.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        self.index
            .ensure_schema(self.embedder.dimensions(), Metric::Cosine)?;

        // Deterministic processing order
        let mut files: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().and_then(|e| e.to_str()) == Some("txt")
            })
            .map(|entry| entry.into_path())
            .collect();
        files.sort();

        let mut stats = IngestStats::default();

        for path in files {
            let source_id = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", path.display(), e);
                    stats.skipped += 1;
                    continue;
                }
            };

            let count = self.ingest_text(&source_id, &text).await?;
            if count == 0 {
                tracing::warn!("Skipping empty file {}", path.display());
                stats.skipped += 1;
            } else {
                stats.sources += 1;
                stats.segments += count;
            }
        }

        tracing::info!(
            sources = stats.sources,
            segments = stats.segments,
            skipped = stats.skipped,
            "Ingestion complete"
        );
        Ok(stats)
    }

    /// Ingest a single document body under the given source id.
    ///
    /// Returns the number of segments written. Ordinals are assigned
    /// gaplessly from zero in chunk order.
    pub async fn ingest_text(&self, source_id: &str, text: &str) -> AppResult<usize> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Ok(0);
        }

        self.index
            .ensure_schema(self.embedder.dimensions(), Metric::Cosine)?;

        let vectors = self.embedder.embed_batch(&chunks).await?;

        let segments: Vec<Segment> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(ordinal, (text, vector))| {
                let mut segment = Segment::new(source_id, ordinal as u32, text);
                segment.vector = vector;
                segment
            })
            .collect();

        let count = segments.len();
        self.index.upsert_batch(&segments)?;

        tracing::debug!(source = source_id, segments = count, "Ingested document");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::index::MemoryIndex;

    fn ingestor(index: Arc<MemoryIndex>) -> Ingestor {
        Ingestor::new(
            Chunker::new(1000, 200).unwrap(),
            Arc::new(TrigramProvider::new(384)),
            index,
        )
    }

    #[tokio::test]
    async fn test_ingest_text_assigns_gapless_ordinals() {
        let index = Arc::new(MemoryIndex::new());
        let ingestor = ingestor(index.clone());

        let text = "wellbeing and routine. ".repeat(150); // ~3450 chars
        let count = ingestor.ingest_text("guide.txt", &text).await.unwrap();
        assert!(count >= 3);

        let stats = index.stats().unwrap();
        assert_eq!(stats.segments as usize, count);
        assert_eq!(stats.sources, 1);
        assert_eq!(stats.dimension, Some(384));
    }

    #[tokio::test]
    async fn test_ingest_empty_text_writes_nothing() {
        let index = Arc::new(MemoryIndex::new());
        let ingestor = ingestor(index.clone());

        let count = ingestor.ingest_text("empty.txt", "   ").await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_ingest_dir_walks_txt_files() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "calm breathing helps with stress").unwrap();
        std::fs::write(temp.path().join("b.txt"), "sleep routines matter for recovery").unwrap();
        std::fs::write(temp.path().join("notes.md"), "ignored markdown file").unwrap();
        std::fs::write(temp.path().join("empty.txt"), "").unwrap();

        let index = Arc::new(MemoryIndex::new());
        let ingestor = ingestor(index.clone());

        let stats = ingestor.ingest_dir(temp.path()).await.unwrap();
        assert_eq!(stats.sources, 2);
        assert_eq!(stats.segments, 2);
        assert_eq!(stats.skipped, 1);
    }

    #[tokio::test]
    async fn test_ingest_missing_dir_is_invalid_input() {
        let index = Arc::new(MemoryIndex::new());
        let ingestor = ingestor(index);

        let err = ingestor
            .ingest_dir(Path::new("/nonexistent/corpus"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
