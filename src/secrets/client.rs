//! Secret store client trait.

use async_trait::async_trait;

use super::types::SecretString;
use crate::errors::Result;
use crate::paths::PhysicalPath;

/// Session-based access to a secret store.
///
/// A client holds at most one active session (endpoint + token). Every data
/// operation addresses exactly one physical path and requires a session
/// established by [`SecretStore::login_with_ldap`] or
/// [`SecretStore::login_with_token`].
///
/// # Errors
///
/// - [`VaultHelperError::AuthenticationFailed`] when there is no session, the
///   credentials are wrong, the endpoint is unreachable during login, or the
///   store rejects the token
/// - [`VaultHelperError::SecretNotFound`] when reading an absent secret
/// - [`VaultHelperError::Transport`] for any other failed request
///
/// [`VaultHelperError::AuthenticationFailed`]: crate::errors::VaultHelperError::AuthenticationFailed
/// [`VaultHelperError::SecretNotFound`]: crate::errors::VaultHelperError::SecretNotFound
/// [`VaultHelperError::Transport`]: crate::errors::VaultHelperError::Transport
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Exchange LDAP credentials for a token and make it the active session.
    async fn login_with_ldap(
        &mut self,
        endpoint: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString>;

    /// Use a previously issued token. No round trip; the store validates it on first use.
    fn login_with_token(&mut self, endpoint: &str, token: SecretString);

    /// Read the secret stored at `path`.
    async fn read(&self, path: &PhysicalPath) -> Result<SecretString>;

    /// Child names under `path`, in store order. An absent path lists as empty.
    async fn list(&self, path: &PhysicalPath) -> Result<Vec<String>>;

    /// Store `value` at `path`, replacing any previous value.
    async fn write(&self, path: &PhysicalPath, value: &SecretString) -> Result<()>;

    /// Remove the secret at `path`.
    async fn delete(&self, path: &PhysicalPath) -> Result<()>;
}
