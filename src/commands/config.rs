//! Configuration CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use docflow_core::config::AppConfig;
use docflow_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand (defaults to `show`)
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check the effective configuration for unusable values
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Show => output::print_item(config, format)?,
        ConfigCommand::Validate => {
            let problems = validate(config);
            if !problems.is_empty() {
                for problem in &problems {
                    output::print_error(problem);
                }
                return Err(AppError::configuration(format!(
                    "Configuration '{}' has {} problem(s)",
                    config_path,
                    problems.len()
                )));
            }

            output::print_success(&format!("Configuration '{}' is valid", config_path));
            output::print_item(config, format)?;
        }
    }
    Ok(())
}

fn validate(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();
    if !matches!(config.logging.format.as_str(), "pretty" | "json") {
        problems.push(format!(
            "logging.format must be 'pretty' or 'json', got '{}'",
            config.logging.format
        ));
    }
    if config.extraction.max_content_bytes == 0 {
        problems.push("extraction.max_content_bytes must be positive".to_string());
    }
    problems
}
