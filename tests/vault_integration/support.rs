//! Shared fixtures for Vault integration tests

use std::path::PathBuf;

use tempfile::TempDir;
use vault_helper::secrets::SecretString;
use vault_helper::tokens::{FileTokenCache, TokenCache, TokenEntry};
use vault_helper::HelperConfiguration;
use wiremock::MockServer;

/// A wiremock Vault plus a temporary state directory holding the
/// configuration, token cache and policy tree.
pub struct TestVault {
    pub server: MockServer,
    pub config: HelperConfiguration,
    pub state_dir: TempDir,
}

impl TestVault {
    /// Label `env` at the mock server with environments dev/, staging/, prod/.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state_dir = TempDir::new().expect("create temp dir");

        let contents = format!(
            r#"
            policy_repository = "{policies}"
            token_cache = "{tokens}"
            timeout = 5

            [[labels]]
            name = "env"
            endpoint = "{endpoint}"
            environments = ["dev/", "staging/", "prod/"]
            "#,
            policies = state_dir.path().join("policies").display(),
            tokens = state_dir.path().join("tokens.toml").display(),
            endpoint = server.uri(),
        );

        let config_path = state_dir.path().join("config.toml");
        std::fs::write(&config_path, contents).expect("write config");
        let config = HelperConfiguration::load_from_path(&config_path).expect("load config");

        Self { server, config, state_dir }
    }

    pub fn token_cache(&self) -> FileTokenCache {
        FileTokenCache::new(self.config.token_cache_path().expect("token cache path"))
    }

    pub fn policy_root(&self) -> PathBuf {
        self.config.policy_repository_path().expect("policy repository path")
    }

    /// Cache a token for `env` as if `login` had run.
    pub fn cache_token(&self, token: &str) {
        self.token_cache()
            .persist(&[TokenEntry::new("env", SecretString::new(token))])
            .expect("persist token");
    }
}
