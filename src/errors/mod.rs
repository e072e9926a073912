//! # Error Handling
//!
//! Error types for vault-helper using `thiserror`. Every variant is fatal for
//! the command that raised it; nothing is downgraded to a warning.

/// Custom result type for vault-helper operations
pub type Result<T> = std::result::Result<T, VaultHelperError>;

/// Main error type for vault-helper
#[derive(thiserror::Error, Debug)]
pub enum VaultHelperError {
    /// No configured label matches the leading segment of the path
    #[error("No configured label matches path '{path}'")]
    NoLabelMatch { path: String },

    /// Token-based login attempted before any LDAP login for the label
    #[error("No cached token for label '{label}', run `vault-helper login` first")]
    NoCachedToken { label: String },

    /// Bad credentials, unreachable endpoint, or a rejected token
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Microservice argument is not of the form `team-service`
    #[error("Invalid microservice name '{name}': expected the form team-service")]
    InvalidMicroserviceName { name: String },

    /// Policy or token document could not be written
    #[error("Persistence failed: {message}")]
    PersistenceFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Secret does not exist at the physical path
    #[error("Secret not found: {path}")]
    SecretNotFound { path: String },

    /// Policy operation issued before the scope was loaded
    #[error("Policies must be loaded before they can be modified or persisted")]
    PolicyNotLoaded,

    /// Policy scope component cannot be mapped onto the repository
    #[error("Invalid policy scope {component} '{value}': {reason}")]
    InvalidPolicyScope { component: String, value: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network transport errors and unexpected store responses
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization { context: String },
}

impl VaultHelperError {
    /// Create a no-label-match error
    pub fn no_label_match<S: Into<String>>(path: S) -> Self {
        Self::NoLabelMatch { path: path.into() }
    }

    /// Create a no-cached-token error
    pub fn no_cached_token<S: Into<String>>(label: S) -> Self {
        Self::NoCachedToken { label: label.into() }
    }

    /// Create an authentication error
    pub fn authentication_failed<S: Into<String>>(message: S) -> Self {
        Self::AuthenticationFailed { message: message.into() }
    }

    /// Create an invalid microservice name error
    pub fn invalid_microservice_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidMicroserviceName { name: name.into() }
    }

    /// Create a persistence error without an underlying source
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::PersistenceFailed { message: message.into(), source: None }
    }

    /// Create a persistence error with source
    pub fn persistence_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::PersistenceFailed { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a secret-not-found error
    pub fn secret_not_found<S: Into<String>>(path: S) -> Self {
        Self::SecretNotFound { path: path.into() }
    }

    /// Create an invalid policy scope error
    pub fn invalid_policy_scope<C, V, R>(component: C, value: V, reason: R) -> Self
    where
        C: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Self::InvalidPolicyScope {
            component: component.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(context: S) -> Self {
        Self::Serialization { context: context.into() }
    }
}

impl From<std::io::Error> for VaultHelperError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error, "I/O operation failed")
    }
}
