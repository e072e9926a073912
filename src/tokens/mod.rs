//! # Token Cache
//!
//! Per-label storage for Vault tokens obtained by `login`. One token per
//! label; the most recent login wins. Validity is never checked locally:
//! an expired token only surfaces when the store rejects it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{Result, VaultHelperError};
use crate::secrets::SecretString;

/// A freshly obtained token for one label.
#[derive(Debug, Clone)]
pub struct TokenEntry {
    pub label: String,
    pub token: SecretString,
}

impl TokenEntry {
    pub fn new(label: impl Into<String>, token: SecretString) -> Self {
        Self { label: label.into(), token }
    }
}

/// Durable keyed storage of tokens by label.
pub trait TokenCache: Send + Sync {
    /// Store the given tokens, replacing any previous token of the same labels.
    fn persist(&self, entries: &[TokenEntry]) -> Result<()>;

    /// Token of the last successful login for `label`.
    ///
    /// Fails with [`VaultHelperError::NoCachedToken`] when nothing was ever
    /// persisted for the label.
    fn read(&self, label: &str) -> Result<SecretString>;
}

/// On-disk shape of one cached label.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedToken {
    #[serde(rename = "VAULT_TOKEN")]
    vault_token: String,
}

type TokenDocument = BTreeMap<String, CachedToken>;

/// Token cache backed by a TOML file (~/.vault-helper/tokens.toml by default).
///
/// ```toml
/// [env]
/// VAULT_TOKEN = "hvs.CAES..."
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<TokenDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            VaultHelperError::io(e, format!("Failed to read token cache: {}", self.path.display()))
        })?;

        let document = toml::from_str(&contents).map_err(|e| {
            VaultHelperError::serialization(format!(
                "Failed to parse token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(document))
    }

    fn write(&self, document: &TokenDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_private_dir(parent)?;
            }
        }

        let contents = toml::to_string_pretty(document).map_err(|e| {
            VaultHelperError::persistence(format!("Failed to serialize token cache: {}", e))
        })?;

        write_private_file(&self.path, contents.as_bytes()).map_err(|e| {
            VaultHelperError::persistence_with_source(
                format!("Failed to write token cache: {}", self.path.display()),
                e,
            )
        })
    }
}

/// Create `dir` and any missing ancestors. Only the directory created here
/// is restricted to the owner; existing ancestors keep their mode.
fn create_private_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        VaultHelperError::persistence_with_source(
            format!("Failed to create directory: {}", dir.display()),
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).map_err(|e| {
            VaultHelperError::persistence_with_source(
                format!("Failed to restrict directory: {}", dir.display()),
                e,
            )
        })?;
    }

    Ok(())
}

/// Write `contents` to a file that is never readable by other users, even
/// while it is being created.
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // mode() only applies on creation; narrow a pre-existing file too.
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)?;
        file.sync_all()
    }
    #[cfg(not(unix))]
    {
        std::fs::write(path, contents)
    }
}

impl TokenCache for FileTokenCache {
    fn persist(&self, entries: &[TokenEntry]) -> Result<()> {
        let mut document = self
            .load()
            .map_err(|e| {
                VaultHelperError::persistence_with_source(
                    format!("Cannot update token cache: {}", self.path.display()),
                    e,
                )
            })?
            .unwrap_or_default();

        for entry in entries {
            document.insert(
                entry.label.clone(),
                CachedToken { vault_token: entry.token.expose_secret().to_string() },
            );
        }

        self.write(&document)?;
        info!(path = %self.path.display(), labels = entries.len(), "Persisted tokens");
        Ok(())
    }

    fn read(&self, label: &str) -> Result<SecretString> {
        let document = self.load()?.ok_or_else(|| {
            debug!(path = %self.path.display(), "Token cache file does not exist");
            VaultHelperError::no_cached_token(label)
        })?;

        document
            .get(label)
            .map(|cached| SecretString::new(cached.vault_token.clone()))
            .ok_or_else(|| VaultHelperError::no_cached_token(label))
    }
}

/// Process-local token cache, used in tests and when embedding the library.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    tokens: Mutex<BTreeMap<String, SecretString>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for InMemoryTokenCache {
    fn persist(&self, entries: &[TokenEntry]) -> Result<()> {
        let mut tokens = self
            .tokens
            .lock()
            .map_err(|_| VaultHelperError::persistence("Token cache lock poisoned"))?;
        for entry in entries {
            tokens.insert(entry.label.clone(), entry.token.clone());
        }
        Ok(())
    }

    fn read(&self, label: &str) -> Result<SecretString> {
        let tokens = self
            .tokens
            .lock()
            .map_err(|_| VaultHelperError::persistence("Token cache lock poisoned"))?;
        tokens.get(label).cloned().ok_or_else(|| VaultHelperError::no_cached_token(label))
    }
}
