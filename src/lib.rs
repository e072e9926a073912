//! # vault-helper
//!
//! Operator tooling for HashiCorp Vault deployments where several
//! environments (e.g. `dev/`, `staging/`, `prod/`) share one secret namespace
//! under a label. A single logical path such as
//! `env/myTeam/myService/jdbc.password` fans out to one physical path per
//! environment of the label `env`.
//!
//! ## Components
//!
//! - **Configuration** ([`config`]): labels, their Vault endpoints and
//!   environment prefixes
//! - **Path resolution** ([`paths`]): logical path to physical paths
//! - **Token cache** ([`tokens`]): per-label Vault tokens from the last login
//! - **Secret store** ([`secrets`]): LDAP/token login and secret CRUD over
//!   Vault's HTTP API
//! - **Policies** ([`policy`]): read grants of a microservice, reconciled
//!   against a versioned document repository
//! - **Services** ([`services`]): per-command orchestration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vault_helper::{
//!     services::SecretService, tokens::FileTokenCache, HelperConfiguration, VaultSecretStore,
//! };
//!
//! # async fn run() -> vault_helper::Result<()> {
//! let config = HelperConfiguration::load_from_path("config.toml".as_ref())?;
//! let tokens = FileTokenCache::new(config.token_cache_path()?);
//! let store = VaultSecretStore::new(config.timeout)?;
//!
//! let mut service = SecretService::new(&config, &tokens, store);
//! for read in service.read("env/myTeam/myService/jdbc.password").await? {
//!     println!("{}", read.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod paths;
pub mod policy;
pub mod secrets;
pub mod services;
pub mod tokens;

// Re-export commonly used types and traits
pub use config::{Environment, HelperConfiguration};
pub use errors::{Result, VaultHelperError};
pub use paths::{LogicalPath, PhysicalPath};
pub use secrets::{SecretStore, SecretString, VaultSecretStore};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
