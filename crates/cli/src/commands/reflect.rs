//! Reflect command handler.

use clap::Args;
use echomind_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Generate a positive reflection over a conversation
#[derive(Args, Debug)]
pub struct ReflectCommand {
    /// Conversation history JSON file
    pub history: PathBuf,

    /// Reflection language (english/en, arabic/ar, french/fr)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Temperature for reflection generation (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReflectCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let language = super::resolve_language(config, self.language.as_deref())?;
        let history = super::load_history(&self.history)?;

        let temperature = AppConfig::clamp_temperature(self.temperature.unwrap_or(config.temperature));
        let assistant = super::build_assistant(config, temperature)?;

        eprintln!("{}", language.resources().thinking);
        let result = assistant.generate_reflection(&history, language).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", result.reflection);
        }

        Ok(())
    }
}
