//! Command handlers for the EchoMind CLI.

mod ask;
mod ingest;
mod reflect;
mod stats;

pub use ask::AskCommand;
pub use ingest::IngestCommand;
pub use reflect::ReflectCommand;
pub use stats::StatsCommand;

use echomind_assistant::Assistant;
use echomind_core::{config::AppConfig, AppError, AppResult, Language};
use echomind_knowledge::{
    create_provider, EmbeddingConfig, EmbeddingProvider, Retriever, SqliteIndex, VectorIndex,
};
use echomind_prompt::ConversationTurn;
use std::path::Path;
use std::sync::Arc;

/// Open the configured SQLite index.
pub(crate) fn open_index(config: &AppConfig) -> AppResult<Arc<dyn VectorIndex>> {
    let index = SqliteIndex::open(&config.index_path)?;
    Ok(Arc::new(index))
}

/// Build the configured embedding provider.
pub(crate) fn build_embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let embedding_config = EmbeddingConfig {
        provider: config.embedding_provider.clone(),
        model: config.embedding_model.clone(),
        dimensions: config.embedding_dim,
        ..Default::default()
    };
    create_provider(&embedding_config)
}

/// Assemble the full assistant pipeline from configuration.
pub(crate) fn build_assistant(config: &AppConfig, temperature: f32) -> AppResult<Assistant> {
    let index = open_index(config)?;
    let embedder = build_embedder(config)?;
    let retriever = Retriever::new(embedder, index, config.top_k);

    let llm = echomind_llm::create_client(&config.provider, None, config.api_key.as_deref())?;

    Ok(Assistant::new(retriever, llm, config.model.clone(), temperature))
}

/// Resolve a language flag against the configured default.
pub(crate) fn resolve_language(config: &AppConfig, flag: Option<&str>) -> AppResult<Language> {
    match flag {
        Some(s) => Language::parse(s).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unknown language: {}. Supported: english (en), arabic (ar), french (fr)",
                s
            ))
        }),
        None => Ok(config.language),
    }
}

/// Load conversation history from a JSON file.
///
/// Expected shape: `[{"role": "user", "content": "..."}, ...]`.
pub(crate) fn load_history(path: &Path) -> AppResult<Vec<ConversationTurn>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::InvalidInput(format!("Failed to read history file {:?}: {}", path, e))
    })?;
    let history: Vec<ConversationTurn> = serde_json::from_str(&contents).map_err(|e| {
        AppError::InvalidInput(format!("Malformed history file {:?}: {}", path, e))
    })?;
    Ok(history)
}
