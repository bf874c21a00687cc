//! CLI command definitions and dispatch.

pub mod config;
pub mod diff;
pub mod replay;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use docflow_core::config::AppConfig;
use docflow_core::error::AppError;

/// DocFlow — versioned document workflows with line diffs
#[derive(Debug, Parser)]
#[command(name = "docflow", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the line differences between two text files
    Diff(diff::DiffArgs),
    /// Run a scripted workflow against an in-memory store
    Replay(replay::ReplayArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Diff(args) => diff::execute(args, &config, self.format).await,
            Commands::Replay(args) => replay::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, &config, self.format),
        }
    }
}
