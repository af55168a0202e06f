//! EchoMind CLI
//!
//! Main entry point for the echomind command-line tool.
//! Provides a retrieval-augmented therapeutic assistant over a local
//! knowledge base.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, ReflectCommand, StatsCommand};
use echomind_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// EchoMind CLI - a supportive assistant over a local knowledge base
#[derive(Parser, Debug)]
#[command(name = "echomind")]
#[command(about = "Retrieval-augmented supportive assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the SQLite vector index
    #[arg(short, long, global = true, env = "ECHOMIND_INDEX")]
    index: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "ECHOMIND_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (ollama, gemini, mock)
    #[arg(short, long, global = true, env = "ECHOMIND_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ECHOMIND_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest text documents into the knowledge base
    Ingest(IngestCommand),

    /// Ask a question and get a supported, cited response
    Ask(AskCommand),

    /// Generate a positive reflection over a conversation
    Reflect(ReflectCommand),

    /// Show knowledge base statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.index,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("EchoMind CLI starting");
    tracing::debug!("Index: {:?}", config.index_path);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Reflect(_) => "reflect",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Reflect(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
