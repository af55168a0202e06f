//! Configuration management for the EchoMind CLI.
//!
//! Configuration is built once at process start from defaults, an optional
//! YAML file, environment variables, and CLI flags (in that precedence
//! order), then passed by reference into component constructors. Core logic
//! never performs ambient environment lookups.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::language::Language;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite vector index
    pub index_path: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider ("ollama", "gemini", "mock")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// API key for the generation provider (Gemini)
    pub api_key: Option<String>,

    /// Embedding provider ("trigram", "ollama")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimension
    pub embedding_dim: usize,

    /// Number of segments to retrieve per query
    pub top_k: usize,

    /// Chunk size in characters
    pub chunk_size: usize,

    /// Overlap between chunks in characters
    pub chunk_overlap: usize,

    /// Default response language
    pub language: Language,

    /// Default sampling temperature, clamped to [0.0, 1.0]
    pub temperature: f32,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    index: Option<IndexConfig>,
    generation: Option<GenerationConfig>,
    embedding: Option<EmbeddingFileConfig>,
    retrieval: Option<RetrievalConfig>,
    chunking: Option<ChunkingConfig>,
    defaults: Option<DefaultsConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerationConfig {
    provider: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingFileConfig {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalConfig {
    #[serde(rename = "topK")]
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkingConfig {
    size: Option<usize>,
    overlap: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefaultsConfig {
    language: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(".echomind/index.sqlite"),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            embedding_provider: "trigram".to_string(),
            embedding_model: "trigram-v1".to_string(),
            embedding_dim: 384,
            top_k: 3,
            chunk_size: 1000,
            chunk_overlap: 200,
            language: Language::English,
            temperature: 0.3,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional YAML
    /// file (`echomind.yaml` in the current directory by default).
    ///
    /// Environment variables:
    /// - `ECHOMIND_CONFIG`: path to config file
    /// - `ECHOMIND_INDEX`: SQLite index path
    /// - `ECHOMIND_PROVIDER`: generation provider
    /// - `ECHOMIND_MODEL`: generation model
    /// - `ECHOMIND_API_KEY` / `GEMINI_API_KEY`: generation API key
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("ECHOMIND_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("echomind.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(index_path) = std::env::var("ECHOMIND_INDEX") {
            config.index_path = PathBuf::from(index_path);
        }

        if let Ok(provider) = std::env::var("ECHOMIND_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("ECHOMIND_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("ECHOMIND_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(index) = config_file.index {
            if let Some(p) = index.path {
                result.index_path = PathBuf::from(p);
            }
        }

        if let Some(generation) = config_file.generation {
            if let Some(provider) = generation.provider {
                result.provider = provider;
            }
            if let Some(model) = generation.model {
                result.model = model;
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding_provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embedding_model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding_dim = dimensions;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(chunking) = config_file.chunking {
            if let Some(size) = chunking.size {
                result.chunk_size = size;
            }
            if let Some(overlap) = chunking.overlap {
                result.chunk_overlap = overlap;
            }
        }

        if let Some(defaults) = config_file.defaults {
            if let Some(language) = defaults.language {
                result.language = Language::parse(&language).ok_or_else(|| {
                    AppError::Config(format!("Unknown language in config: {}", language))
                })?;
            }
            if let Some(temperature) = defaults.temperature {
                result.temperature = temperature;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides, giving precedence to flags over everything else.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        index_path: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(index_path) = index_path {
            self.index_path = index_path;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration before any component is constructed.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "gemini", "mock"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown generation provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        let known_embedding = ["trigram", "ollama"];
        if !known_embedding.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_embedding.join(", ")
            )));
        }

        if self.provider == "gemini" && self.api_key.is_none() {
            return Err(AppError::Config(
                "Gemini provider requires GEMINI_API_KEY".to_string(),
            ));
        }

        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be positive".to_string()));
        }

        if self.embedding_dim == 0 {
            return Err(AppError::Config(
                "Embedding dimension must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Clamp a requested temperature into the supported [0.0, 1.0] range.
    pub fn clamp_temperature(temperature: f32) -> f32 {
        temperature.clamp(0.0, 1.0)
    }
}
