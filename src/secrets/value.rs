//! Secret value arguments.
//!
//! A value of the form `file://<path>` is loaded from that local file;
//! anything else is taken literally.

use std::path::Path;

use tracing::debug;

use super::types::SecretString;
use crate::errors::{Result, VaultHelperError};

pub const FILE_SCHEME: &str = "file://";

/// Turn a `--value` argument into the payload to store.
pub fn load_secret_value(raw: &str) -> Result<SecretString> {
    match raw.strip_prefix(FILE_SCHEME) {
        Some(path) => {
            let path = Path::new(path);
            debug!(path = %path.display(), "Reading secret value from file");
            let contents = std::fs::read_to_string(path).map_err(|e| {
                VaultHelperError::io(e, format!("Failed to read secret file: {}", path.display()))
            })?;
            Ok(SecretString::new(contents))
        }
        None => Ok(SecretString::new(raw)),
    }
}
