//! Label and environment settings loaded from the configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::default_state_dir;
use crate::errors::{Result, VaultHelperError};

/// Framework used for policy scopes when none is given on the command line
pub const DEFAULT_FRAMEWORK: &str = "marathon";

/// One physical environment served under a label, identified by its path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    pub prefix: String,
}

impl Environment {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

/// A label and the environments it fans out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Leading path segment operators type, e.g. "env"
    pub name: String,

    /// Vault base URL serving every environment of this label
    pub endpoint: String,

    /// Environment prefixes in fan-out order
    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// Configuration file contents (~/.vault-helper/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfiguration {
    /// Framework name used when --framework is not passed
    #[serde(default = "default_framework")]
    pub default_framework: String,

    /// Root directory of the policy document tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_repository: Option<PathBuf>,

    /// Token cache file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_cache: Option<PathBuf>,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Configured labels, in matching order
    #[serde(default)]
    pub labels: Vec<LabelConfig>,
}

fn default_framework() -> String {
    DEFAULT_FRAMEWORK.to_string()
}

impl HelperConfiguration {
    /// Load and validate configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VaultHelperError::io(e, format!("Failed to read config file: {}", path.display()))
        })?;

        let config = Self::from_toml(&contents).map_err(|e| match e {
            VaultHelperError::Config { message } => {
                VaultHelperError::config(format!("{} ({})", message, path.display()))
            }
            other => other,
        })?;

        debug!(path = %path.display(), labels = config.labels.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| VaultHelperError::config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(VaultHelperError::config("At least one label must be configured"));
        }

        for (index, label) in self.labels.iter().enumerate() {
            if label.name.is_empty() || label.name.contains('/') {
                return Err(VaultHelperError::config(format!(
                    "Label name '{}' must be non-empty and must not contain '/'",
                    label.name
                )));
            }

            if self.labels[..index].iter().any(|other| other.name == label.name) {
                return Err(VaultHelperError::config(format!(
                    "Label '{}' is configured more than once",
                    label.name
                )));
            }

            url::Url::parse(&label.endpoint).map_err(|e| {
                VaultHelperError::config(format!(
                    "Invalid endpoint '{}' for label '{}': {}",
                    label.endpoint, label.name, e
                ))
            })?;
        }

        Ok(())
    }

    /// Names of all configured labels, in configuration order
    pub fn get_labels(&self) -> Vec<&str> {
        self.labels.iter().map(|label| label.name.as_str()).collect()
    }

    fn label(&self, name: &str) -> Result<&LabelConfig> {
        self.labels
            .iter()
            .find(|label| label.name == name)
            .ok_or_else(|| VaultHelperError::config(format!("Unknown label '{}'", name)))
    }

    /// Vault endpoint serving the label
    pub fn get_vault_endpoint(&self, label: &str) -> Result<&str> {
        Ok(self.label(label)?.endpoint.as_str())
    }

    /// Environments of the label in fan-out order
    pub fn get_environments(&self, label: &str) -> Result<&[Environment]> {
        Ok(self.label(label)?.environments.as_slice())
    }

    /// First configured label whose name equals the leading segment of `path`
    pub fn get_label_for_path(&self, path: &str) -> Result<&str> {
        let leading = path.split('/').next().unwrap_or_default();

        self.labels
            .iter()
            .find(|label| label.name == leading)
            .map(|label| label.name.as_str())
            .ok_or_else(|| VaultHelperError::no_label_match(path))
    }

    /// Policy repository root, defaulting to ~/.vault-helper/policies
    pub fn policy_repository_path(&self) -> Result<PathBuf> {
        match &self.policy_repository {
            Some(path) => Ok(path.clone()),
            None => Ok(default_state_dir()?.join("policies")),
        }
    }

    /// Token cache location, defaulting to ~/.vault-helper/tokens.toml
    pub fn token_cache_path(&self) -> Result<PathBuf> {
        match &self.token_cache {
            Some(path) => Ok(path.clone()),
            None => Ok(default_state_dir()?.join("tokens.toml")),
        }
    }
}
