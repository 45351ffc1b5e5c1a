//! CLI module for Question Forge
//!
//! Subcommands:
//! - `serve`: run the HTTP API and the optional static UI
//! - `models`: print the model registry
//! - `generate`: produce one question set without the HTTP layer

pub mod generate;
pub mod models;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Question Forge - exam question generation over locally hosted LLMs
#[derive(Parser)]
#[command(name = "question-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// List the registered models
    Models,

    /// Generate one question set and print the output path
    Generate(generate::GenerateArgs),
}

/// Load `.env`, the layered configuration and the log subscriber
pub fn bootstrap(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path)?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["question-forge", "models", "--config", "prod.toml"]).unwrap();

        assert_eq!(cli.config.as_deref(), Some("prod.toml"));
        assert!(matches!(cli.command, Command::Models));
    }
}
