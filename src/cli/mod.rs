//! # Command Line Interface
//!
//! Provides the `vault-helper` command tree: LDAP login, secret management
//! across every environment of a label, microservice read policies and
//! configuration inspection.

pub mod config_cmd;
pub mod login;
pub mod output;
pub mod policies;
pub mod secrets;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{resolve_config_path, HelperConfiguration};

#[derive(Parser)]
#[command(name = "vault-helper")]
#[command(about = "Manage Vault secrets and read policies across labeled environments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to $VAULT_HELPER_CONFIG, then ~/.vault-helper/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to every configured label with LDAP credentials
    Login(login::LoginArgs),

    /// Read the secret at a path in every environment
    Read(secrets::PathArgs),

    /// List secrets underneath a path in every environment
    List(secrets::PathArgs),

    /// Write a secret value to a path in every environment
    Write(secrets::WriteArgs),

    /// Delete the secret at a path in every environment
    Delete(secrets::PathArgs),

    /// Show the read policies of a microservice
    ReadPolicies(policies::ReadPoliciesArgs),

    /// Grant a microservice read access to a path in every environment
    AddPolicies(policies::PolicyPathArgs),

    /// Revoke a microservice's read access to a path in every environment
    RemovePolicies(policies::PolicyPathArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    let config_path = resolve_config_path(cli.config_path)?;

    match cli.command {
        Commands::Config { command } => config_cmd::handle_config_command(command, &config_path)?,
        command => {
            let config = load_configuration(&config_path)?;
            handle_command(command, &config).await?
        }
    }

    Ok(())
}

async fn handle_command(command: Commands, config: &HelperConfiguration) -> anyhow::Result<()> {
    match command {
        Commands::Login(args) => login::handle_login_command(args, config).await,
        Commands::Read(args) => secrets::handle_read(args, config).await,
        Commands::List(args) => secrets::handle_list(args, config).await,
        Commands::Write(args) => secrets::handle_write(args, config).await,
        Commands::Delete(args) => secrets::handle_delete(args, config).await,
        Commands::ReadPolicies(args) => policies::handle_read_policies(args, config),
        Commands::AddPolicies(args) => policies::handle_add_policies(args, config),
        Commands::RemovePolicies(args) => policies::handle_remove_policies(args, config),
        Commands::Config { .. } => anyhow::bail!("Configuration commands are handled before loading"),
    }
}

fn load_configuration(path: &std::path::Path) -> anyhow::Result<HelperConfiguration> {
    HelperConfiguration::load_from_path(path)
        .with_context(|| format!("Unable to load configuration from {}", path.display()))
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
