//! Policy scope, grants and their persisted document form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultHelperError};
use crate::paths::PhysicalPath;

/// Capability carried by every grant managed here
pub const READ_CAPABILITY: &str = "read";

/// A `team-service` microservice identifier.
///
/// The name is split on the first `-`, so a team name must not itself contain
/// `-`: `platform-core-api` parses as team `platform`, service `core-api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroserviceName {
    pub team: String,
    pub service: String,
}

impl MicroserviceName {
    pub fn parse(name: &str) -> Result<Self> {
        let (team, service) = name
            .split_once('-')
            .ok_or_else(|| VaultHelperError::invalid_microservice_name(name))?;

        Ok(Self { team: team.to_string(), service: service.to_string() })
    }
}

impl fmt::Display for MicroserviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team, self.service)
    }
}

/// Identifies one policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyScope {
    pub framework: String,
    pub group: String,
    pub team: String,
    pub service: String,
}

impl PolicyScope {
    pub fn new(
        framework: impl Into<String>,
        group: impl Into<String>,
        team: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            framework: framework.into(),
            group: group.into(),
            team: team.into(),
            service: service.into(),
        }
    }

    pub fn for_microservice(
        framework: impl Into<String>,
        group: impl Into<String>,
        microservice: &MicroserviceName,
    ) -> Self {
        Self::new(framework, group, microservice.team.clone(), microservice.service.clone())
    }

    /// `(component name, value)` pairs in repository nesting order
    pub fn components(&self) -> [(&'static str, &str); 4] {
        [
            ("framework", self.framework.as_str()),
            ("group", self.group.as_str()),
            ("team", self.team.as_str()),
            ("service", self.service.as_str()),
        ]
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}-{}", self.framework, self.group, self.team, self.service)
    }
}

fn read_capabilities() -> Vec<String> {
    vec![READ_CAPABILITY.to_string()]
}

/// Read access to one physical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub path: String,
    #[serde(default = "read_capabilities")]
    pub capabilities: Vec<String>,
}

impl PolicyEntry {
    pub fn read(path: &PhysicalPath) -> Self {
        Self { path: path.as_str().to_string(), capabilities: read_capabilities() }
    }
}

/// Persisted form of a policy scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(flatten)]
    pub scope: PolicyScope,

    /// Incremented by every persist; informational only, never compared
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub grants: Vec<PolicyEntry>,
}

/// In-memory policy of one scope, grants kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    scope: PolicyScope,
    entries: Vec<PolicyEntry>,
}

impl Policy {
    pub fn empty(scope: PolicyScope) -> Self {
        Self { scope, entries: Vec::new() }
    }

    /// Rebuild a policy from its document, dropping duplicate paths.
    pub fn from_document(document: PolicyDocument) -> Self {
        let mut policy = Self::empty(document.scope);
        for grant in document.grants {
            if !policy.contains(&grant.path) {
                policy.entries.push(grant);
            }
        }
        policy
    }

    pub fn to_document(&self, version: u64) -> PolicyDocument {
        PolicyDocument { scope: self.scope.clone(), version, grants: self.entries.clone() }
    }

    pub fn scope(&self) -> &PolicyScope {
        &self.scope
    }

    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    /// Returns `true` when the grant was not present before.
    pub fn add_read(&mut self, path: &PhysicalPath) -> bool {
        if self.contains(path.as_str()) {
            return false;
        }
        self.entries.push(PolicyEntry::read(path));
        true
    }

    /// Returns `true` when a grant was removed.
    pub fn remove(&mut self, path: &PhysicalPath) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.path != path.as_str());
        self.entries.len() != before
    }

    /// Render the grants as a Vault HCL policy.
    pub fn to_hcl(&self) -> String {
        let mut hcl = format!("# {}\n", self.scope);
        for entry in &self.entries {
            let capabilities = entry
                .capabilities
                .iter()
                .map(|capability| format!("\"{}\"", capability))
                .collect::<Vec<_>>()
                .join(", ");
            hcl.push_str(&format!(
                "\npath \"{}\" {{\n  capabilities = [{}]\n}}\n",
                entry.path, capabilities
            ));
        }
        hcl
    }
}
