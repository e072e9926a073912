//! Secret commands against a mock Vault, end to end through the services

use serde_json::json;
use vault_helper::secrets::{load_secret_value, SecretString, VaultSecretStore};
use vault_helper::services::{LoginService, SecretService};
use vault_helper::tokens::TokenCache;
use vault_helper::VaultHelperError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use super::support::TestVault;

const ENVIRONMENTS: [&str; 3] = ["dev", "staging", "prod"];

#[tokio::test]
async fn test_login_then_write_uses_fresh_token() {
    let vault = TestVault::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/ldap/login/alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "auth": { "client_token": "s.login" } })),
        )
        .expect(1)
        .mount(&vault.server)
        .await;

    let tokens = vault.token_cache();
    let mut store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let labels = LoginService::new(&vault.config, &tokens)
        .login(&mut store, "alice", &SecretString::new("pw"))
        .await
        .unwrap();
    assert_eq!(labels, vec!["env"]);
    assert_eq!(tokens.read("env").unwrap().expose_secret(), "s.login");

    let contents = std::fs::read_to_string(vault.config.token_cache_path().unwrap()).unwrap();
    assert!(contents.contains("[env]"));
    assert!(contents.contains("VAULT_TOKEN = \"s.login\""));

    Mock::given(method("POST"))
        .and(path("/v1/dev/a"))
        .and(header("X-Vault-Token", "s.login"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&vault.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/staging/a"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&vault.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/prod/a"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&vault.server)
        .await;

    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);
    service.write("env/a", &SecretString::new("v")).await.unwrap();
}

#[tokio::test]
async fn test_write_hits_each_environment_exactly_once() {
    let vault = TestVault::start().await;
    vault.cache_token("s.cached");

    for environment in ENVIRONMENTS {
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}/teamX/svcY/password", environment)))
            .and(header("X-Vault-Token", "s.cached"))
            .and(body_json(json!({ "value": "secret123" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault.server)
            .await;
    }

    let tokens = vault.token_cache();
    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);

    let written = service
        .write("env/teamX/svcY/password", &SecretString::new("secret123"))
        .await
        .unwrap();
    assert_eq!(written.len(), 3);

    vault.server.verify().await;
}

#[tokio::test]
async fn test_write_file_value_stores_file_contents() {
    let vault = TestVault::start().await;
    vault.cache_token("s.cached");

    let secret_file = vault.state_dir.path().join("s.txt");
    std::fs::write(&secret_file, "-----BEGIN KEY-----\nabc\n-----END KEY-----\n").unwrap();

    for environment in ENVIRONMENTS {
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}/teamX/svcY/key.pem", environment)))
            .and(body_json(json!({ "value": "-----BEGIN KEY-----\nabc\n-----END KEY-----\n" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault.server)
            .await;
    }

    let value = load_secret_value(&format!("file://{}", secret_file.display())).unwrap();
    let tokens = vault.token_cache();
    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);
    service.write("env/teamX/svcY/key.pem", &value).await.unwrap();

    vault.server.verify().await;
}

#[tokio::test]
async fn test_missing_token_makes_no_requests() {
    let vault = TestVault::start().await;

    let tokens = vault.token_cache();
    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);

    let err = service.read("env/teamX/svcY/password").await.unwrap_err();
    assert!(matches!(err, VaultHelperError::NoCachedToken { ref label } if label == "env"));

    let requests = vault.server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_read_stops_at_first_failure() {
    let vault = TestVault::start().await;
    vault.cache_token("s.cached");

    Mock::given(method("GET"))
        .and(path("/v1/dev/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "value": "d" } })))
        .expect(1)
        .mount(&vault.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/staging/a"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&vault.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/prod/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "value": "p" } })))
        .expect(0)
        .mount(&vault.server)
        .await;

    let tokens = vault.token_cache();
    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);

    let err = service.read("env/a").await.unwrap_err();
    assert!(matches!(err, VaultHelperError::SecretNotFound { ref path } if path == "staging/a"));

    vault.server.verify().await;
}

#[tokio::test]
async fn test_list_reports_each_environment() {
    let vault = TestVault::start().await;
    vault.cache_token("s.cached");

    Mock::given(method("GET"))
        .and(path("/v1/dev/teamX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "keys": ["svcY/"] } })))
        .mount(&vault.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/staging/teamX"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&vault.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/prod/teamX"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "keys": ["svcY/", "svcZ/"] } })),
        )
        .mount(&vault.server)
        .await;

    let tokens = vault.token_cache();
    let store = VaultSecretStore::new(vault.config.timeout).unwrap();
    let mut service = SecretService::new(&vault.config, &tokens, store);

    let listings = service.list("env/teamX").await.unwrap();
    let summary: Vec<(&str, usize)> =
        listings.iter().map(|listing| (listing.path.as_str(), listing.keys.len())).collect();
    assert_eq!(summary, vec![("dev/teamX", 1), ("staging/teamX", 0), ("prod/teamX", 2)]);
}
