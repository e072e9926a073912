//! Policy commands through the file-backed policy repository

use vault_helper::policy::{FilePolicyRepository, PolicyDocument, PolicyScope};
use vault_helper::services::PolicyService;
use vault_helper::VaultHelperError;

use super::support::TestVault;

fn stored_document(vault: &TestVault, scope: &PolicyScope) -> PolicyDocument {
    let path = vault
        .policy_root()
        .join(&scope.framework)
        .join(&scope.group)
        .join(&scope.team)
        .join(format!("{}.yaml", scope.service));
    let contents = std::fs::read_to_string(path).expect("policy document");
    serde_yaml::from_str(&contents).expect("valid policy document")
}

#[tokio::test]
async fn test_add_then_read_policies() {
    let vault = TestVault::start().await;
    let repository = FilePolicyRepository::new(vault.policy_root());
    let service = PolicyService::new(&vault.config, &repository);

    service.add_policies(None, "payments", "teamX-svcY", "env/teamX/svcY/password").unwrap();
    service.add_policies(None, "payments", "teamX-svcY", "env/shared/db").unwrap();

    let policy = service.read_policies(None, "payments", "teamX-svcY").unwrap();
    let paths: Vec<&str> = policy.entries().iter().map(|entry| entry.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "dev/teamX/svcY/password",
            "staging/teamX/svcY/password",
            "prod/teamX/svcY/password",
            "dev/shared/db",
            "staging/shared/db",
            "prod/shared/db",
        ]
    );

    let document = stored_document(&vault, policy.scope());
    assert_eq!(document.version, 2);
    assert_eq!(document.grants.len(), 6);
    assert!(document.grants.iter().all(|grant| grant.capabilities == vec!["read"]));
}

#[tokio::test]
async fn test_remove_policies_keeps_other_grants() {
    let vault = TestVault::start().await;
    let repository = FilePolicyRepository::new(vault.policy_root());
    let service = PolicyService::new(&vault.config, &repository);

    service.add_policies(Some("chronos"), "batch", "ops-report", "env/a").unwrap();
    service.add_policies(Some("chronos"), "batch", "ops-report", "env/b").unwrap();
    let policy = service.remove_policies(Some("chronos"), "batch", "ops-report", "env/a").unwrap();

    let paths: Vec<&str> = policy.entries().iter().map(|entry| entry.path.as_str()).collect();
    assert_eq!(paths, vec!["dev/b", "staging/b", "prod/b"]);
    assert_eq!(stored_document(&vault, policy.scope()).version, 3);
}

#[tokio::test]
async fn test_invalid_microservice_is_rejected() {
    let vault = TestVault::start().await;
    let repository = FilePolicyRepository::new(vault.policy_root());
    let service = PolicyService::new(&vault.config, &repository);

    let err = service.read_policies(None, "payments", "teamXsvcY").unwrap_err();
    assert!(matches!(err, VaultHelperError::InvalidMicroserviceName { .. }));
    assert!(!vault.policy_root().exists());
}

#[tokio::test]
async fn test_scope_with_path_separator_is_rejected() {
    let vault = TestVault::start().await;
    let repository = FilePolicyRepository::new(vault.policy_root());
    let service = PolicyService::new(&vault.config, &repository);

    let err = service.add_policies(None, "../escape", "teamX-svcY", "env/a").unwrap_err();
    assert!(matches!(err, VaultHelperError::InvalidPolicyScope { .. }));
}
