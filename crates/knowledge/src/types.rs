//! Core data types for the knowledge base.

use serde::{Deserialize, Serialize};

/// A chunk of source text with its embedding, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Unique segment identifier
    pub id: String,

    /// Identifier of the originating document (file name for file sources)
    pub source_id: String,

    /// Zero-based position of this chunk within its source
    pub ordinal: u32,

    /// Chunk text content
    pub text: String,

    /// Embedding vector
    pub vector: Vec<f32>,
}

impl Segment {
    /// Create a segment with a fresh UUID.
    pub fn new(source_id: impl Into<String>, ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_id: source_id.into(),
            ordinal,
            text: text.into(),
            vector: Vec::new(),
        }
    }

    /// Human-readable provenance label ("From: {source}, Chunk: {ordinal}").
    pub fn citation(&self) -> String {
        format!("From: {}, Chunk: {}", self.source_id, self.ordinal)
    }
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of source documents processed
    pub sources: usize,

    /// Number of segments embedded and upserted
    pub segments: usize,

    /// Source files skipped (unreadable or empty)
    pub skipped: usize,
}

/// Statistics reported by a vector index backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of distinct sources
    pub sources: u32,

    /// Number of stored segments
    pub segments: u32,

    /// Declared embedding dimension, if the schema has been initialized
    pub dimension: Option<usize>,
}
