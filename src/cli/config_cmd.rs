//! Configuration inspection CLI commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use super::output::{self, OutputFormat};
use crate::config::HelperConfiguration;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "yaml", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Print the configuration file path in use
    Path,
}

/// Handle config commands
pub fn handle_config_command(command: ConfigCommands, config_path: &Path) -> Result<()> {
    match command {
        ConfigCommands::Show { output } => show_config(config_path, &output),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn show_config(config_path: &Path, output_format: &str) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!("No configuration file found at: {}", config_path.display());
    }

    let config = HelperConfiguration::load_from_path(config_path)?;

    match OutputFormat::parse(output_format)? {
        OutputFormat::Table => print!("{}", render_config_table(&config, config_path)?),
        OutputFormat::Json => output::print_json(&config)?,
        _ => output::print_yaml(&config)?,
    }

    Ok(())
}

fn render_config_table(config: &HelperConfiguration, config_path: &Path) -> Result<String> {
    let mut table = output::table_header(&[("LABEL", 12), ("ENDPOINT", 40), ("ENVIRONMENTS", 30)]);
    table.push('\n');

    for label in &config.labels {
        let environments = label
            .environments
            .iter()
            .map(|environment| environment.prefix.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.push_str(&format!("{:<12} {:<40} {}\n", label.name, label.endpoint, environments));
    }

    table.push('\n');
    table.push_str(&format!("{:<20} {}\n", "default_framework", config.default_framework));
    table.push_str(&format!(
        "{:<20} {}\n",
        "policy_repository",
        config.policy_repository_path()?.display()
    ));
    table.push_str(&format!("{:<20} {}\n", "token_cache", config.token_cache_path()?.display()));
    table.push_str(&format!(
        "{:<20} {}\n",
        "timeout",
        config
            .timeout
            .map(|t| format!("{} seconds", t))
            .unwrap_or_else(|| "<transport default>".to_string())
    ));
    table.push_str(&format!("{:<20} {}\n", "config file", config_path.display()));

    Ok(table)
}
