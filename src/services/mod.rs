//! Command orchestration services
//!
//! Each service threads the configuration, token cache, secret store and
//! policy repository through one family of commands. Store calls over the
//! expanded paths run one at a time and the first failure aborts the rest.

pub mod login_service;
pub mod policy_service;
pub mod secret_service;

pub use login_service::LoginService;
pub use policy_service::{PolicyChange, PolicyService};
pub use secret_service::{SecretListing, SecretRead, SecretService};
