//! Policy repository implementations.
//!
//! The repository is a whole-document store keyed by policy scope. Writes
//! replace the stored document; there is no merge and no locking.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, instrument};

use super::model::{PolicyDocument, PolicyScope};
use crate::errors::{Result, VaultHelperError};

/// Whole-document storage of policies by scope.
pub trait PolicyRepository: Send + Sync {
    /// Stored document of the scope, or `None` when the scope was never persisted.
    fn load(&self, scope: &PolicyScope) -> Result<Option<PolicyDocument>>;

    /// Replace the stored document of `document.scope`.
    fn store(&self, document: &PolicyDocument) -> Result<()>;
}

/// Validates one scope component before it becomes a directory or file name.
pub fn validate_scope_component(component: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VaultHelperError::invalid_policy_scope(component, value, "cannot be empty"));
    }

    if value.contains('/') || value.contains('\\') {
        return Err(VaultHelperError::invalid_policy_scope(
            component,
            value,
            "cannot contain path separators",
        ));
    }

    if value == "." || value == ".." {
        return Err(VaultHelperError::invalid_policy_scope(
            component,
            value,
            "cannot be a relative directory",
        ));
    }

    Ok(())
}

/// Policy documents stored as a YAML file tree:
/// `<root>/<framework>/<group>/<team>/<service>.yaml`.
#[derive(Debug, Clone)]
pub struct FilePolicyRepository {
    root: PathBuf,
}

impl FilePolicyRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the document of `scope`
    pub fn document_path(&self, scope: &PolicyScope) -> Result<PathBuf> {
        for (component, value) in scope.components() {
            validate_scope_component(component, value)?;
        }

        Ok(self
            .root
            .join(&scope.framework)
            .join(&scope.group)
            .join(&scope.team)
            .join(format!("{}.yaml", scope.service)))
    }
}

impl PolicyRepository for FilePolicyRepository {
    #[instrument(skip_all, fields(scope = %scope))]
    fn load(&self, scope: &PolicyScope) -> Result<Option<PolicyDocument>> {
        let path = self.document_path(scope)?;

        if !path.exists() {
            debug!(path = %path.display(), "No policy document for scope");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            VaultHelperError::io(e, format!("Failed to read policy document: {}", path.display()))
        })?;

        let mut document: PolicyDocument = serde_yaml::from_str(&contents).map_err(|e| {
            VaultHelperError::serialization(format!(
                "Failed to parse policy document {}: {}",
                path.display(),
                e
            ))
        })?;
        // The file location is authoritative for the scope.
        document.scope = scope.clone();

        debug!(path = %path.display(), grants = document.grants.len(), "Loaded policy document");
        Ok(Some(document))
    }

    #[instrument(skip_all, fields(scope = %document.scope, version = document.version))]
    fn store(&self, document: &PolicyDocument) -> Result<()> {
        let path = self.document_path(&document.scope)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultHelperError::persistence_with_source(
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let contents = serde_yaml::to_string(document).map_err(|e| {
            VaultHelperError::persistence(format!("Failed to serialize policy document: {}", e))
        })?;

        std::fs::write(&path, contents).map_err(|e| {
            VaultHelperError::persistence_with_source(
                format!("Failed to write policy document: {}", path.display()),
                e,
            )
        })?;

        info!(path = %path.display(), grants = document.grants.len(), "Stored policy document");
        Ok(())
    }
}

/// Process-local repository, used in tests and when embedding the library.
#[derive(Debug, Default)]
pub struct InMemoryPolicyRepository {
    documents: Mutex<Vec<PolicyDocument>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.lock().map(|documents| documents.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn load(&self, scope: &PolicyScope) -> Result<Option<PolicyDocument>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| VaultHelperError::persistence("Policy repository lock poisoned"))?;
        Ok(documents.iter().find(|document| &document.scope == scope).cloned())
    }

    fn store(&self, document: &PolicyDocument) -> Result<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| VaultHelperError::persistence("Policy repository lock poisoned"))?;

        match documents.iter_mut().find(|existing| existing.scope == document.scope) {
            Some(existing) => *existing = document.clone(),
            None => documents.push(document.clone()),
        }
        Ok(())
    }
}
