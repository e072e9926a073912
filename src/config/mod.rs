//! # Configuration Management
//!
//! Label/environment configuration for vault-helper. The configuration is a
//! TOML file read once per invocation and passed by reference to whatever
//! needs it; there is no global configuration state.

pub mod settings;

pub use settings::{Environment, HelperConfiguration, LabelConfig, DEFAULT_FRAMEWORK};

use std::path::PathBuf;

use tracing::debug;

use crate::errors::{Result, VaultHelperError};

/// Environment variable that overrides the configuration file location
pub const CONFIG_PATH_ENV: &str = "VAULT_HELPER_CONFIG";

/// Directory under the home directory holding vault-helper state
pub const STATE_DIR: &str = ".vault-helper";

/// Resolve the user's home directory from `HOME` or `USERPROFILE`.
pub fn home_dir() -> Result<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .map_err(|_| VaultHelperError::config("Unable to determine home directory"))
}

/// Default state directory (~/.vault-helper)
pub fn default_state_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(STATE_DIR))
}

/// Default configuration file location (~/.vault-helper/config.toml)
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_state_dir()?.join("config.toml"))
}

/// Resolve the configuration file path from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --config-path command line flag
/// 2. VAULT_HELPER_CONFIG environment variable
/// 3. Default: ~/.vault-helper/config.toml
pub fn resolve_config_path(config_path_flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = config_path_flag {
        debug!("Using configuration from --config-path flag: {}", path.display());
        return Ok(path);
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            debug!("Using configuration from {} environment variable: {}", CONFIG_PATH_ENV, path);
            return Ok(PathBuf::from(path));
        }
    }

    let path = default_config_path()?;
    debug!("Using default configuration path: {}", path.display());
    Ok(path)
}
