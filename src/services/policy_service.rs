//! Microservice read-policy commands.

use tracing::{info, instrument};

use crate::config::HelperConfiguration;
use crate::errors::{Result, VaultHelperError};
use crate::paths::resolve;
use crate::policy::{MicroserviceName, Policy, PolicyReconciler, PolicyRepository, PolicyScope};

/// Direction of a grant change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyChange {
    Add,
    Remove,
}

pub struct PolicyService<'a> {
    config: &'a HelperConfiguration,
    repository: &'a dyn PolicyRepository,
}

impl<'a> PolicyService<'a> {
    pub fn new(config: &'a HelperConfiguration, repository: &'a dyn PolicyRepository) -> Self {
        Self { config, repository }
    }

    fn scope(&self, framework: Option<&str>, group: &str, microservice: &str) -> Result<PolicyScope> {
        let microservice = MicroserviceName::parse(microservice)?;
        let framework = framework.unwrap_or(self.config.default_framework.as_str());
        Ok(PolicyScope::for_microservice(framework, group, &microservice))
    }

    /// Current grants of the microservice; an unknown scope reads as empty.
    #[instrument(skip(self))]
    pub fn read_policies(
        &self,
        framework: Option<&str>,
        group: &str,
        microservice: &str,
    ) -> Result<Policy> {
        let scope = self.scope(framework, group, microservice)?;
        let mut reconciler = PolicyReconciler::new(self.repository);
        Ok(reconciler.load_policies(scope)?.clone())
    }

    /// Grant read access to every environment path of `path`.
    pub fn add_policies(
        &self,
        framework: Option<&str>,
        group: &str,
        microservice: &str,
        path: &str,
    ) -> Result<Policy> {
        self.apply(PolicyChange::Add, framework, group, microservice, path)
    }

    /// Revoke read access to every environment path of `path`.
    pub fn remove_policies(
        &self,
        framework: Option<&str>,
        group: &str,
        microservice: &str,
        path: &str,
    ) -> Result<Policy> {
        self.apply(PolicyChange::Remove, framework, group, microservice, path)
    }

    /// Load the scope, apply `change` for each expanded path and persist the
    /// whole document. The document is persisted even when nothing changed.
    #[instrument(skip(self))]
    pub fn apply(
        &self,
        change: PolicyChange,
        framework: Option<&str>,
        group: &str,
        microservice: &str,
        path: &str,
    ) -> Result<Policy> {
        let scope = self.scope(framework, group, microservice)?;
        let label = self.config.get_label_for_path(path)?;
        let paths = resolve(label, self.config.get_environments(label)?, path);

        let mut reconciler = PolicyReconciler::new(self.repository);
        reconciler.load_policies(scope)?;

        let mut changed = 0;
        for physical in &paths {
            let applied = match change {
                PolicyChange::Add => reconciler.add_read_policy(physical)?,
                PolicyChange::Remove => reconciler.remove_read_policy(physical)?,
            };
            if applied {
                changed += 1;
            }
        }

        reconciler.persist()?;
        info!(?change, changed, total = reconciler.get_policies().len(), "Reconciled policies");

        reconciler.policy().cloned().ok_or(VaultHelperError::PolicyNotLoaded)
    }
}
