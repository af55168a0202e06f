//! Core infrastructure for the EchoMind assistant.
//!
//! Shared error types, configuration, logging setup, and the localized
//! language resources used across every crate in the workspace.

pub mod config;
pub mod error;
pub mod language;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use language::{Language, LanguageResources};
pub use logging::init_logging;
