//! Diff CLI command.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::output::{self, OutputFormat};
use docflow_core::config::AppConfig;
use docflow_core::error::{AppError, ErrorKind};
use docflow_core::traits::ContentExtractor;
use docflow_diff::{TextExtractor, apply, diff};

/// Arguments for the diff command
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous revision
    pub old: PathBuf,
    /// New revision
    pub new: PathBuf,
    /// Also print the lines each hunk removes and adds (table output only)
    #[arg(long)]
    pub lines: bool,
}

/// Difference display row
#[derive(Debug, Serialize, Tabled)]
struct DifferenceRow {
    /// Change kind
    #[tabled(rename = "type")]
    kind: String,
    /// Previous section start
    previous_start: i64,
    /// Previous section size
    previous_size: i64,
    /// New section start
    new_start: i64,
    /// New section size
    new_size: i64,
}

/// Execute the diff command
pub async fn execute(
    args: &DiffArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let extractor = TextExtractor::from_config(&config.extraction);
    let old = read_lines(&extractor, &args.old).await?;
    let new = read_lines(&extractor, &args.new).await?;

    let differences = diff(&old, &new);
    let rebuilt = apply(&old, &new, &differences)?;
    if rebuilt != new {
        return Err(AppError::invariant_violation(
            "Edit script does not reproduce the new revision",
        ));
    }
    debug!(hunks = differences.len(), "Edit script verified");

    match format {
        OutputFormat::Json => output::print_item(&differences, format)?,
        OutputFormat::Table => {
            if differences.is_empty() {
                output::print_success("Files are identical");
                return Ok(());
            }
            let rows: Vec<DifferenceRow> = differences
                .iter()
                .map(|d| DifferenceRow {
                    kind: d.difference_type().to_string(),
                    previous_start: d.previous_section_start(),
                    previous_size: d.previous_section_size(),
                    new_start: d.new_section_start(),
                    new_size: d.new_section_size(),
                })
                .collect();
            output::print_list(&rows, format)?;

            if args.lines {
                for d in &differences {
                    println!("@@ {} @@", d.difference_type());
                    for line in &old[d.previous_range()] {
                        println!("- {line}");
                    }
                    for line in &new[d.new_range()] {
                        println!("+ {line}");
                    }
                }
            }
        }
    }
    Ok(())
}

async fn read_lines(extractor: &TextExtractor, path: &Path) -> Result<Vec<String>, AppError> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read '{}'", path.display()),
            e,
        )
    })?;
    let name = path.file_name().and_then(|n| n.to_str());
    Ok(extractor.extract(&content, name)?.lines)
}
