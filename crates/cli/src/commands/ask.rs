//! Ask command handler.

use clap::Args;
use echomind_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Ask a question and get a supported, cited response
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question or concern to respond to
    pub query: Option<String>,

    /// Read the query from a file
    #[arg(short, long, conflicts_with = "query")]
    pub file: Option<PathBuf>,

    /// Response language (english/en, arabic/ar, french/fr)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Conversation history JSON file
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Temperature for response generation (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let query = self
            .get_query()
            .ok_or_else(|| AppError::InvalidInput("No query provided".to_string()))?;

        let language = super::resolve_language(config, self.language.as_deref())?;
        let history = match &self.history {
            Some(path) => super::load_history(path)?,
            None => Vec::new(),
        };

        let temperature = AppConfig::clamp_temperature(self.temperature.unwrap_or(config.temperature));
        let assistant = super::build_assistant(config, temperature)?;

        eprintln!("{}", language.resources().thinking);
        let result = assistant
            .generate_response(&query, &history, language)
            .await?;

        if self.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", result.response);

            if !result.sources.is_empty() {
                println!("\n--- Sources ---");
                for source in &result.sources {
                    println!("- {}", source);
                }
            }
        }

        Ok(())
    }

    fn get_query(&self) -> Option<String> {
        self.query.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read query file: {}", e))
                    .ok()
            })
        })
    }
}
