//! Read-grant reconciliation for one policy scope.
//!
//! A reconciler moves through `Unloaded -> Loaded -> Modified -> Persisted`
//! within one invocation. The document it persists fully replaces the stored
//! one: concurrent operators race, and the last writer wins.

use tracing::{debug, info};

use super::model::{Policy, PolicyEntry, PolicyScope};
use super::repository::PolicyRepository;
use crate::errors::{Result, VaultHelperError};
use crate::paths::PhysicalPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    Unloaded,
    Loaded,
    Modified,
    Persisted,
}

pub struct PolicyReconciler<'a> {
    repository: &'a dyn PolicyRepository,
    state: ReconcilerState,
    policy: Option<Policy>,
    version: u64,
}

impl<'a> PolicyReconciler<'a> {
    pub fn new(repository: &'a dyn PolicyRepository) -> Self {
        Self { repository, state: ReconcilerState::Unloaded, policy: None, version: 0 }
    }

    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    /// Fetch the scope's document, starting from an empty grant set when absent.
    pub fn load_policies(&mut self, scope: PolicyScope) -> Result<&Policy> {
        let (policy, version) = match self.repository.load(&scope)? {
            Some(document) => {
                let version = document.version;
                (Policy::from_document(document), version)
            }
            None => {
                debug!(scope = %scope, "Starting from an empty policy");
                (Policy::empty(scope), 0)
            }
        };

        self.version = version;
        self.state = ReconcilerState::Loaded;
        Ok(self.policy.insert(policy))
    }

    fn loaded_mut(&mut self) -> Result<&mut Policy> {
        self.policy.as_mut().ok_or(VaultHelperError::PolicyNotLoaded)
    }

    /// Grant read access to `path`. Adding an existing grant is a no-op.
    pub fn add_read_policy(&mut self, path: &PhysicalPath) -> Result<bool> {
        let added = self.loaded_mut()?.add_read(path);
        if added {
            debug!(path = %path, "Added read grant");
            self.state = ReconcilerState::Modified;
        }
        Ok(added)
    }

    /// Revoke the read grant of `path`. Removing an absent grant is a no-op.
    pub fn remove_read_policy(&mut self, path: &PhysicalPath) -> Result<bool> {
        let removed = self.loaded_mut()?.remove(path);
        if removed {
            debug!(path = %path, "Removed read grant");
            self.state = ReconcilerState::Modified;
        }
        Ok(removed)
    }

    /// Write the whole current document back to the repository.
    pub fn persist(&mut self) -> Result<()> {
        let policy = self.policy.as_ref().ok_or(VaultHelperError::PolicyNotLoaded)?;
        let version = self.version + 1;
        let document = policy.to_document(version);

        self.repository.store(&document).map_err(|e| match e {
            VaultHelperError::PersistenceFailed { .. } => e,
            other => VaultHelperError::persistence_with_source(
                format!("Failed to persist policies for {}", document.scope),
                other,
            ),
        })?;

        info!(scope = %document.scope, version, grants = document.grants.len(), "Persisted policies");
        self.version = version;
        self.state = ReconcilerState::Persisted;
        Ok(())
    }

    /// Current grants in insertion order; empty before loading.
    pub fn get_policies(&self) -> &[PolicyEntry] {
        self.policy.as_ref().map(Policy::entries).unwrap_or_default()
    }

    /// The loaded policy, if any
    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }
}
