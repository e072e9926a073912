//! # Path Resolution
//!
//! Expands a label-prefixed logical path into one physical path per
//! environment registered for the label. Resolution is purely syntactic:
//! nothing here talks to the secret store.

use std::fmt;

use serde::Serialize;

use crate::config::Environment;

/// A path as supplied by the operator, split into its leading segment and remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPath {
    raw: String,
    leading: String,
    remainder: Option<String>,
}

impl LogicalPath {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (leading, remainder) = match raw.split_once('/') {
            Some((leading, remainder)) => (leading.to_string(), Some(remainder.to_string())),
            None => (raw.clone(), None),
        };

        Self { raw, leading, remainder }
    }

    /// First `/`-separated segment
    pub fn leading_segment(&self) -> &str {
        &self.leading
    }

    /// Everything after the first `/`, if there was one
    pub fn remainder(&self) -> Option<&str> {
        self.remainder.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the path belongs to `label` (label followed by `/` or end of string)
    pub fn is_under_label(&self, label: &str) -> bool {
        self.leading == label
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A store-addressable path for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhysicalPath(String);

impl PhysicalPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhysicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhysicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve `logical_path` against the environments of `label`.
///
/// Paths under the label yield one physical path per environment, in
/// environment order. Any other path is returned unchanged as the only
/// element. A label without environments yields an empty list.
pub fn resolve(label: &str, environments: &[Environment], logical_path: &str) -> Vec<PhysicalPath> {
    let parsed = LogicalPath::parse(logical_path);

    if !parsed.is_under_label(label) {
        return vec![PhysicalPath::new(logical_path)];
    }

    environments.iter().map(|environment| join(&environment.prefix, parsed.remainder())).collect()
}

fn join(prefix: &str, remainder: Option<&str>) -> PhysicalPath {
    let prefix = prefix.trim_end_matches('/');
    match remainder {
        Some(remainder) => PhysicalPath::new(format!("{}/{}", prefix, remainder)),
        None => PhysicalPath::new(prefix),
    }
}
