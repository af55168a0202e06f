//! Ingest command handler.

use clap::Args;
use echomind_core::{config::AppConfig, AppResult};
use echomind_knowledge::{Chunker, Ingestor};
use std::path::PathBuf;

/// Ingest text documents into the knowledge base
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Directory of .txt documents to ingest
    pub path: PathBuf,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Clear the index before ingesting
    #[arg(long)]
    pub reset: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Ingesting documents from {:?}", self.path);

        let index = super::open_index(config)?;
        let embedder = super::build_embedder(config)?;

        if self.reset {
            index.reset()?;
            println!("Index cleared.");
        }

        let chunker = Chunker::new(
            self.chunk_size.unwrap_or(config.chunk_size),
            self.chunk_overlap.unwrap_or(config.chunk_overlap),
        )?;

        let ingestor = Ingestor::new(chunker, embedder, index);
        let stats = ingestor.ingest_dir(&self.path).await?;

        println!(
            "Ingested {} segments from {} sources ({} skipped).",
            stats.segments, stats.sources, stats.skipped
        );

        Ok(())
    }
}
