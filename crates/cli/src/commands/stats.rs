//! Stats command handler.

use clap::Args;
use echomind_core::{config::AppConfig, AppError, AppResult};

/// Show knowledge base statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let index = super::open_index(config)?;
        let stats = index.stats()?;

        if self.json {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("Index: {}", config.index_path.display());
            println!("Sources:  {}", stats.sources);
            println!("Segments: {}", stats.segments);
            match stats.dimension {
                Some(dimension) => println!("Dimension: {}", dimension),
                None => println!("Dimension: (not initialized)"),
            }
        }

        Ok(())
    }
}
