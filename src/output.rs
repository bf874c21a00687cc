//! Rendering of command results as tables or JSON.
//!
//! Lists render one row per item. A single item renders as a two-column
//! field/value table, with nested objects flattened into dotted paths.

use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use docflow_core::error::AppError;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One flattened field of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct FieldRow {
    /// Dotted path of the field, e.g. `logging.level`
    #[tabled(rename = "Field")]
    pub field: String,
    /// Rendered scalar value
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table if items.is_empty() => println!("(nothing to show)"),
        OutputFormat::Table => println!("{}", render_rows(items)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => println!("{}", render_rows(&field_rows(item)?)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
    }
    Ok(())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("ok: {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("warning: {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("error: {msg}");
}

fn render_rows<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

/// Flatten `item` into field/value rows in serialization order.
pub fn field_rows<T: Serialize>(item: &T) -> Result<Vec<FieldRow>, AppError> {
    let mut rows = Vec::new();
    flatten(String::new(), &serde_json::to_value(item)?, &mut rows);
    Ok(rows)
}

fn flatten(path: String, value: &Value, rows: &mut Vec<FieldRow>) {
    let join = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                flatten(join(key), nested, rows);
            }
        }
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            for (index, nested) in items.iter().enumerate() {
                flatten(format!("{path}[{index}]"), nested, rows);
            }
        }
        Value::Array(items) => rows.push(FieldRow {
            field: path,
            value: items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        }),
        other => rows.push(FieldRow {
            field: path,
            value: scalar(other),
        }),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) => "{}".to_string(),
        other => other.to_string(),
    }
}
