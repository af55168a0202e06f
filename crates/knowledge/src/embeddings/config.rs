//! Embedding provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for an embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("trigram", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Embedding dimensions
    pub dimensions: usize,

    /// Maximum texts per embedding request
    #[serde(rename = "batchSize")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            batch_size: 32,
        }
    }
}
