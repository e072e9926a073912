//! Secret store access.
//!
//! The [`SecretStore`] trait is the seam between command orchestration and
//! the remote store; [`VaultSecretStore`] implements it over Vault's HTTP
//! API. Values and tokens travel as [`SecretString`] so they never reach
//! logs or debug output.

pub mod client;
pub mod types;
pub mod value;
pub mod vault;

pub use client::SecretStore;
pub use types::SecretString;
pub use value::load_secret_value;
pub use vault::VaultSecretStore;
