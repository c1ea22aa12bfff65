//! Command-line interface definitions using clap
//!
//! A thin front end over [`ShortenerService`]: every command opens the
//! configured store, runs, then flushes before exit.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::StaticConfig;
use crate::errors::Result;
use crate::services::ShortenerService;

/// linkmap - durable URL <-> short code store
#[derive(Parser, Debug)]
#[command(name = "linkmap")]
#[command(version)]
#[command(about = "Map long URLs to short codes and back", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Override store.data_file
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shorten one or more URLs, printing one code per line
    Shorten {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the URL behind a short code
    Resolve { code: String },

    /// Show store statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

impl Cli {
    /// Resolve the effective configuration: file and environment, then
    /// command-line overrides.
    pub fn load_config(&self) -> StaticConfig {
        let mut config = StaticConfig::load_from(self.config.as_deref().unwrap_or("config.toml"));
        if let Some(data_file) = &self.data_file {
            config.store.data_file = data_file.clone();
        }
        config
    }
}

/// Execute a parsed command against `config`.
pub async fn run(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Config {
            action: ConfigCommands::Generate { output },
        } => commands::generate_config(output),
        command => {
            let service = ShortenerService::open(&config.store).await?;
            let outcome = match command {
                Commands::Shorten { urls } => commands::shorten(&service, &urls),
                Commands::Resolve { code } => commands::resolve(&service, &code),
                Commands::Stats => {
                    commands::stats(&service);
                    Ok(())
                }
                Commands::Config { .. } => Ok(()),
            };
            let flushed = service.shutdown().await;
            outcome.and(flushed)
        }
    }
}
