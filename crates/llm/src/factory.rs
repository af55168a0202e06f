//! LLM provider factory.
//!
//! Maps a provider name from configuration onto a concrete client,
//! injecting the API key where one is required.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, MockClient, OllamaClient};
use echomind_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "gemini", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for Gemini)
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Gemini provider requires an API key".to_string())
            })?;
            let mut client = GeminiClient::new(api_key);
            if let Some(endpoint) = endpoint {
                client = client.with_base_url(endpoint);
            }
            Ok(Arc::new(client))
        }
        "mock" => Ok(Arc::new(MockClient::default())),
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}
