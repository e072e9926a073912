//! Secret read/list/write/delete over every environment of a label.

use tracing::{debug, info, instrument};

use crate::config::HelperConfiguration;
use crate::errors::Result;
use crate::paths::{resolve, PhysicalPath};
use crate::secrets::{SecretStore, SecretString};
use crate::tokens::TokenCache;

/// Value read from one physical path.
#[derive(Debug, Clone)]
pub struct SecretRead {
    pub path: PhysicalPath,
    pub value: SecretString,
}

/// Children listed under one physical path.
#[derive(Debug, Clone)]
pub struct SecretListing {
    pub path: PhysicalPath,
    pub keys: Vec<String>,
}

/// Secret operations addressed by logical path.
///
/// Every operation looks up the label of the path, opens a session with the
/// label's cached token, expands the path to one physical path per
/// environment and applies the store call to each in environment order.
pub struct SecretService<'a, S> {
    config: &'a HelperConfiguration,
    tokens: &'a dyn TokenCache,
    store: S,
}

impl<'a, S: SecretStore> SecretService<'a, S> {
    pub fn new(config: &'a HelperConfiguration, tokens: &'a dyn TokenCache, store: S) -> Self {
        Self { config, tokens, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Open a session for the label of `path` and expand it.
    ///
    /// Fails before any network call when the label has no cached token.
    fn connect(&mut self, path: &str) -> Result<Vec<PhysicalPath>> {
        let config = self.config;
        let label = config.get_label_for_path(path)?;
        let token = self.tokens.read(label)?;
        let endpoint = config.get_vault_endpoint(label)?;

        self.store.login_with_token(endpoint, token);

        let paths = resolve(label, config.get_environments(label)?, path);
        debug!(label, endpoint, count = paths.len(), "Expanded logical path");
        Ok(paths)
    }

    #[instrument(skip(self))]
    pub async fn read(&mut self, path: &str) -> Result<Vec<SecretRead>> {
        let mut results = Vec::new();
        for physical in self.connect(path)? {
            let value = self.store.read(&physical).await?;
            results.push(SecretRead { path: physical, value });
        }
        Ok(results)
    }

    #[instrument(skip(self))]
    pub async fn list(&mut self, path: &str) -> Result<Vec<SecretListing>> {
        let mut results = Vec::new();
        for physical in self.connect(path)? {
            let keys = self.store.list(&physical).await?;
            results.push(SecretListing { path: physical, keys });
        }
        Ok(results)
    }

    /// Write `value` to every expanded path; returns the paths written.
    #[instrument(skip(self, value))]
    pub async fn write(&mut self, path: &str, value: &SecretString) -> Result<Vec<PhysicalPath>> {
        let paths = self.connect(path)?;
        for physical in &paths {
            self.store.write(physical, value).await?;
            info!(path = %physical, "Wrote secret");
        }
        Ok(paths)
    }

    /// Delete every expanded path; returns the paths deleted.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, path: &str) -> Result<Vec<PhysicalPath>> {
        let paths = self.connect(path)?;
        for physical in &paths {
            self.store.delete(physical).await?;
            info!(path = %physical, "Deleted secret");
        }
        Ok(paths)
    }
}
