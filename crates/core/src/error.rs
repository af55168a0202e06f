//! Error types for the EchoMind assistant.
//!
//! The variants map one-to-one onto the failure classes of the pipeline:
//! invalid caller input, bad configuration, and the three "capability
//! unavailable" conditions that drive degraded-mode and apology behavior.

use thiserror::Error;

/// Unified error type for the EchoMind workspace.
///
/// All fallible functions return `Result<T, AppError>`. We never panic —
/// errors must be represented and propagated, so callers can distinguish
/// "no results" from "the capability is down".
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-supplied input rejected before any I/O (e.g. empty query)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed configuration (chunk size/overlap, unknown provider, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedding model could not be loaded or invoked.
    ///
    /// Fatal to the current retrieval attempt; never silently recovered.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The vector index backend could not be reached.
    ///
    /// Recovered locally by the retriever as degraded mode.
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// The generation backend failed or timed out.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// An existing index has a different dimension or metric.
    ///
    /// Ingestion-time only; must stop the ingestion batch.
    #[error("Schema conflict: {0}")]
    SchemaConflict(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
