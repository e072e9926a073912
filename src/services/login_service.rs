//! LDAP login across every configured label.

use tracing::{info, instrument};

use crate::config::HelperConfiguration;
use crate::errors::Result;
use crate::secrets::{SecretStore, SecretString};
use crate::tokens::{TokenCache, TokenEntry};

pub struct LoginService<'a> {
    config: &'a HelperConfiguration,
    tokens: &'a dyn TokenCache,
}

impl<'a> LoginService<'a> {
    pub fn new(config: &'a HelperConfiguration, tokens: &'a dyn TokenCache) -> Self {
        Self { config, tokens }
    }

    /// Log in to the endpoint of every label, in configuration order, then
    /// persist the obtained tokens together.
    ///
    /// A failed login aborts before anything is persisted. Returns the labels
    /// that now hold a fresh token.
    #[instrument(skip(self, store, password))]
    pub async fn login<S: SecretStore + ?Sized>(
        &self,
        store: &mut S,
        username: &str,
        password: &SecretString,
    ) -> Result<Vec<String>> {
        let mut entries = Vec::with_capacity(self.config.labels.len());

        for label in self.config.get_labels() {
            let endpoint = self.config.get_vault_endpoint(label)?;
            let token = store.login_with_ldap(endpoint, username, password).await?;
            info!(label, endpoint, "Obtained token");
            entries.push(TokenEntry::new(label, token));
        }

        self.tokens.persist(&entries)?;

        Ok(entries.into_iter().map(|entry| entry.label).collect())
    }
}
