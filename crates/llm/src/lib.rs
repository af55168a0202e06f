//! LLM integration crate for the EchoMind assistant.
//!
//! This crate provides a provider-agnostic abstraction for generating
//! responses with Large Language Models through a unified trait-based
//! interface.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Gemini**: Google Gemini via the generateContent API
//! - **Mock**: Scripted replies for tests and offline demos
//!
//! # Example
//! ```no_run
//! use echomind_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse};
pub use factory::create_client;
pub use providers::{GeminiClient, MockClient, OllamaClient};
