//! Knowledge base crate for the EchoMind assistant.
//!
//! Covers the ingestion and retrieval halves of the pipeline: chunking
//! source documents, embedding text, storing vectors in a SQLite or
//! in-memory index, and ranking segments against a query.

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod ingest;
pub mod retriever;
pub mod types;

pub use chunker::Chunker;
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use index::{MemoryIndex, Metric, SqliteIndex, VectorIndex};
pub use ingest::Ingestor;
pub use retriever::{Retrieval, RetrievalResult, Retriever};
pub use types::{IndexStats, IngestStats, Segment};
