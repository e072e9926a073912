//! HTTP client behaviour against a mock Vault

use serde_json::json;
use vault_helper::secrets::{SecretStore, SecretString, VaultSecretStore};
use vault_helper::{PhysicalPath, VaultHelperError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn session(server: &MockServer) -> VaultSecretStore {
    let mut store = VaultSecretStore::new(Some(5)).unwrap();
    store.login_with_token(&server.uri(), SecretString::new("s.cached"));
    store
}

#[tokio::test]
async fn test_ldap_login_returns_client_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/ldap/login/alice"))
        .and(body_json(json!({ "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "auth": { "client_token": "s.fresh" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut store = VaultSecretStore::new(None).unwrap();
    let token = store.login_with_ldap(&server.uri(), "alice", &SecretString::new("pw")).await.unwrap();

    assert_eq!(token.expose_secret(), "s.fresh");
    assert_eq!(store.endpoint(), Some(server.uri().as_str()));
}

#[tokio::test]
async fn test_ldap_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/ldap/login/alice"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "errors": ["invalid credentials"] })))
        .mount(&server)
        .await;

    let mut store = VaultSecretStore::new(None).unwrap();
    let err = store.login_with_ldap(&server.uri(), "alice", &SecretString::new("bad")).await.unwrap_err();

    assert!(matches!(err, VaultHelperError::AuthenticationFailed { .. }));
    assert_eq!(store.endpoint(), None);
}

#[tokio::test]
async fn test_ldap_login_unreachable_endpoint() {
    let mut store = VaultSecretStore::new(Some(1)).unwrap();
    let err = store
        .login_with_ldap("http://127.0.0.1:1", "alice", &SecretString::new("pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, VaultHelperError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn test_read_sends_token_and_returns_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/teamX/svcY/password"))
        .and(header("X-Vault-Token", "s.cached"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "value": "secret123" } })))
        .expect(1)
        .mount(&server)
        .await;

    let store = session(&server).await;
    let value = store.read(&PhysicalPath::new("dev/teamX/svcY/password")).await.unwrap();
    assert_eq!(value.expose_secret(), "secret123");
}

#[tokio::test]
async fn test_read_without_value_field_renders_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/db"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": "app", "port": 5432 } })),
        )
        .mount(&server)
        .await;

    let store = session(&server).await;
    let value = store.read(&PhysicalPath::new("dev/db")).await.unwrap();
    let rendered: serde_json::Value = serde_json::from_str(value.expose_secret()).unwrap();
    assert_eq!(rendered, json!({ "user": "app", "port": 5432 }));
}

#[tokio::test]
async fn test_read_missing_secret() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
        .mount(&server)
        .await;

    let store = session(&server).await;
    let err = store.read(&PhysicalPath::new("dev/missing")).await.unwrap_err();
    assert!(matches!(err, VaultHelperError::SecretNotFound { ref path } if path == "dev/missing"));
}

#[tokio::test]
async fn test_rejected_token_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/a"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })))
        .mount(&server)
        .await;

    let store = session(&server).await;
    let err = store.read(&PhysicalPath::new("dev/a")).await.unwrap_err();
    assert!(matches!(err, VaultHelperError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/dev/a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = session(&server).await;
    let err = store.write(&PhysicalPath::new("dev/a"), &SecretString::new("v")).await.unwrap_err();
    assert!(matches!(err, VaultHelperError::Transport { .. }));
}

#[tokio::test]
async fn test_list_returns_keys_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/teamX"))
        .and(query_param("list", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "keys": ["svcY/", "alpha", "beta"] } })),
        )
        .mount(&server)
        .await;

    let store = session(&server).await;
    let keys = store.list(&PhysicalPath::new("dev/teamX")).await.unwrap();
    assert_eq!(keys, vec!["svcY/", "alpha", "beta"]);
}

#[tokio::test]
async fn test_list_absent_path_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dev/nothing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
        .mount(&server)
        .await;

    let store = session(&server).await;
    assert!(store.list(&PhysicalPath::new("dev/nothing")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_write_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/dev/a"))
        .and(header("X-Vault-Token", "s.cached"))
        .and(body_json(json!({ "value": "v1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/dev/a"))
        .and(header("X-Vault-Token", "s.cached"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = session(&server).await;
    store.write(&PhysicalPath::new("dev/a"), &SecretString::new("v1")).await.unwrap();
    store.delete(&PhysicalPath::new("dev/a")).await.unwrap();
}

#[tokio::test]
async fn test_operations_without_session_fail() {
    let store = VaultSecretStore::new(None).unwrap();
    let err = store.read(&PhysicalPath::new("dev/a")).await.unwrap_err();
    assert!(matches!(err, VaultHelperError::AuthenticationFailed { .. }));
}
