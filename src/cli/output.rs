//! Shared output formatting utilities for CLI commands
//!
//! Results go to stdout as JSON, YAML, a plain table or (for policies) Vault
//! HCL. Logs go to stderr and never mix with these.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Hcl,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "table" => Ok(OutputFormat::Table),
            "hcl" => Ok(OutputFormat::Hcl),
            _ => anyhow::bail!(
                "Unsupported output format: '{}'. Use 'json', 'yaml', 'table', or 'hcl'.",
                s
            ),
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", to_json(data)?);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", to_yaml(data)?);
    Ok(())
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

/// Print one result line in green, indented under its heading
pub fn print_item(item: &str) {
    println!("\t{}", item.green());
}

/// Print a status line in green
pub fn print_success(message: &str) {
    println!("{}", message.green());
}

/// Format a table header followed by its separator
pub fn table_header(columns: &[(&str, usize)]) -> String {
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    format!("{}\n{}", header.trim_end(), "-".repeat(total_width.saturating_sub(1)))
}
