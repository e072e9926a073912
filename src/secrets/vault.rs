//! HashiCorp Vault secret store over the HTTP API.
//!
//! Endpoints used:
//! - `POST   {endpoint}/v1/auth/ldap/login/{username}` with `{"password": ..}`
//! - `GET    {endpoint}/v1/{path}` returning `{"data": {"value": ..}}`
//! - `GET    {endpoint}/v1/{path}?list=true` returning `{"data": {"keys": [..]}}`
//! - `POST   {endpoint}/v1/{path}` with `{"value": ..}`
//! - `DELETE {endpoint}/v1/{path}`
//!
//! Authenticated requests carry the session token in `X-Vault-Token`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::client::SecretStore;
use super::types::SecretString;
use crate::errors::{Result, VaultHelperError};
use crate::paths::PhysicalPath;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Mount path of the LDAP auth method
const LDAP_MOUNT: &str = "ldap";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    client_token: String,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: ListData,
}

#[derive(Debug, Deserialize, Default)]
struct ListData {
    #[serde(default)]
    keys: Vec<String>,
}

#[derive(Debug, Clone)]
struct Session {
    endpoint: String,
    token: SecretString,
}

/// Vault client holding one active session.
#[derive(Debug, Clone)]
pub struct VaultSecretStore {
    http: Client,
    session: Option<Session>,
}

impl VaultSecretStore {
    /// Create a client. `timeout` is in seconds; `None` keeps the transport default.
    pub fn new(timeout: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http = builder.build().map_err(|e| {
            VaultHelperError::transport(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { http, session: None })
    }

    /// Endpoint of the active session, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.endpoint.as_str())
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| {
            VaultHelperError::authentication_failed("No active session, log in before using the store")
        })
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header(TOKEN_HEADER, session.token.expose_secret())
    }

    /// Map a response onto the error taxonomy, passing successes through.
    async fn check(response: Response, path: &PhysicalPath) -> Result<Response> {
        let status = response.status();
        debug!(path = %path, status = %status, "Vault response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(VaultHelperError::authentication_failed(format!(
                    "Vault rejected the token for '{}' (status {}): {}",
                    path, status, body
                )))
            }
            StatusCode::NOT_FOUND => Err(VaultHelperError::secret_not_found(path.as_str())),
            _ => Err(VaultHelperError::transport(format!(
                "Vault request for '{}' failed with status {}: {}",
                path, status, body
            ))),
        }
    }

    fn send_error(path: &PhysicalPath, error: reqwest::Error) -> VaultHelperError {
        VaultHelperError::transport(format!("Failed to send request for '{}': {}", path, error))
    }
}

/// Build `{endpoint}/v1/{segments..}`, encoding every path segment.
fn api_url(endpoint: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        VaultHelperError::config(format!("Invalid Vault endpoint '{}': {}", endpoint, e))
    })?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            VaultHelperError::config(format!("Vault endpoint '{}' cannot be a base URL", endpoint))
        })?;
        segments.pop_if_empty().push("v1");
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            segments.push(segment);
        }
    }

    Ok(url)
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn login_with_ldap(
        &mut self,
        endpoint: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString> {
        let mut url = api_url(endpoint, &format!("auth/{}/login", LDAP_MOUNT))?;
        url.path_segments_mut()
            .map_err(|_| VaultHelperError::config("Vault endpoint cannot be a base URL"))?
            .push(username);

        debug!(endpoint = %endpoint, username = %username, "Logging in with LDAP");

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "password": password.expose_secret() }))
            .send()
            .await
            .map_err(|e| {
                VaultHelperError::authentication_failed(format!(
                    "Vault at {} is unreachable: {}",
                    endpoint, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = %status, "LDAP login rejected");
            return Err(VaultHelperError::authentication_failed(format!(
                "LDAP login for '{}' at {} failed with status {}",
                username, endpoint, status
            )));
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            VaultHelperError::authentication_failed(format!(
                "Unexpected LDAP login response from {}: {}",
                endpoint, e
            ))
        })?;

        let token = SecretString::new(login.auth.client_token);
        self.session = Some(Session { endpoint: endpoint.to_string(), token: token.clone() });

        info!(endpoint = %endpoint, username = %username, "LDAP login succeeded");
        Ok(token)
    }

    fn login_with_token(&mut self, endpoint: &str, token: SecretString) {
        debug!(endpoint = %endpoint, "Using cached token");
        self.session = Some(Session { endpoint: endpoint.to_string(), token });
    }

    async fn read(&self, path: &PhysicalPath) -> Result<SecretString> {
        let session = self.session()?;
        let url = api_url(&session.endpoint, path.as_str())?;

        let response = self
            .authorized(self.http.get(url), session)
            .send()
            .await
            .map_err(|e| Self::send_error(path, e))?;
        let response = Self::check(response, path).await?;

        let body: ReadResponse = response.json().await.map_err(|e| {
            VaultHelperError::serialization(format!("Failed to parse secret at '{}': {}", path, e))
        })?;

        match body.data.get("value") {
            Some(serde_json::Value::String(value)) => Ok(SecretString::new(value.clone())),
            _ => {
                let rendered = serde_json::to_string(&body.data).map_err(|e| {
                    VaultHelperError::serialization(format!("Failed to render secret data: {}", e))
                })?;
                Ok(SecretString::new(rendered))
            }
        }
    }

    async fn list(&self, path: &PhysicalPath) -> Result<Vec<String>> {
        let session = self.session()?;
        let mut url = api_url(&session.endpoint, path.as_str())?;
        url.query_pairs_mut().append_pair("list", "true");

        let response = self
            .authorized(self.http.get(url), session)
            .send()
            .await
            .map_err(|e| Self::send_error(path, e))?;

        let response = match Self::check(response, path).await {
            Ok(response) => response,
            Err(VaultHelperError::SecretNotFound { .. }) => {
                debug!(path = %path, "Nothing stored under path");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let body: ListResponse = response.json().await.map_err(|e| {
            VaultHelperError::serialization(format!("Failed to parse listing of '{}': {}", path, e))
        })?;

        Ok(body.data.keys)
    }

    async fn write(&self, path: &PhysicalPath, value: &SecretString) -> Result<()> {
        let session = self.session()?;
        let url = api_url(&session.endpoint, path.as_str())?;

        let response = self
            .authorized(self.http.post(url), session)
            .json(&serde_json::json!({ "value": value.expose_secret() }))
            .send()
            .await
            .map_err(|e| Self::send_error(path, e))?;
        Self::check(response, path).await?;

        debug!(path = %path, "Vault accepted write");
        Ok(())
    }

    async fn delete(&self, path: &PhysicalPath) -> Result<()> {
        let session = self.session()?;
        let url = api_url(&session.endpoint, path.as_str())?;

        let response = self
            .authorized(self.http.delete(url), session)
            .send()
            .await
            .map_err(|e| Self::send_error(path, e))?;
        Self::check(response, path).await?;

        debug!(path = %path, "Vault accepted delete");
        Ok(())
    }
}
