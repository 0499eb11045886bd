//! Blocking Vault HTTP client: TLS certificate login and KV v2 reads.

use crate::{
    config::{ClientCertificate, VaultConfig},
    error::{VaultError, VaultResult},
    provider::SecretStore,
    secrets::{AuthResponse, ErrorResponse, KvResponse, flatten},
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use rust_common::{HttpConfig, PemIdentity, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Vault client. Holds configuration only; the HTTP client is created per
/// login because it carries the client certificate.
#[derive(Debug, Clone, Default)]
pub struct VaultClient {
    config: VaultConfig,
}

/// Authenticated Vault session.
pub struct VaultSession {
    addr: String,
    token: SecretString,
    http: Client,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("addr", &self.addr)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl VaultSession {
    /// Vault address this session is bound to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl VaultClient {
    /// Create a new Vault client.
    #[must_use]
    pub const fn new(config: VaultConfig) -> Self {
        Self { config }
    }

    fn load_identity(certificate: &ClientCertificate) -> VaultResult<PemIdentity> {
        let read = |path: &Path, what: &str| {
            std::fs::read(path).map_err(|e| {
                VaultError::invalid_config(format!(
                    "cannot read client {what} {}: {e}",
                    path.display()
                ))
            })
        };
        let cert = read(&certificate.cert_path, "certificate")?;
        let key = read(&certificate.key_path, "key")?;
        Ok(PemIdentity::new(cert, key))
    }

    fn http_config(&self) -> HttpConfig {
        HttpConfig::default()
            .with_timeout(self.config.timeout)
            .with_connect_timeout(self.config.connect_timeout)
    }
}

fn normalize_addr(addr: &str) -> VaultResult<String> {
    let addr = addr.trim().trim_end_matches('/');
    if addr.is_empty() {
        return Err(VaultError::invalid_config("Vault address is empty"));
    }
    if !(addr.starts_with("http://") || addr.starts_with("https://")) {
        return Err(VaultError::invalid_config(format!(
            "Vault address must be an http(s) URL: {addr}"
        )));
    }
    Ok(addr.to_string())
}

fn send(request: reqwest::blocking::RequestBuilder) -> VaultResult<Response> {
    request.send().map_err(|e| {
        if e.is_timeout() {
            VaultError::unavailable(format!("request timed out: {e}"))
        } else {
            VaultError::unavailable(e.to_string())
        }
    })
}

fn error_text(response: Response) -> String {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    format!("Status {status}: {}", ErrorResponse::describe(&body))
}

impl SecretStore for VaultClient {
    type Session = VaultSession;

    #[instrument(skip(self, certificate), fields(cert = %certificate.cert_path.display()))]
    fn authenticate(
        &self,
        addr: &str,
        certificate: &ClientCertificate,
    ) -> VaultResult<VaultSession> {
        let addr = normalize_addr(addr)?;
        let identity = Self::load_identity(certificate)?;
        let http = build_http_client(&self.http_config(), Some(&identity))?;

        let url = format!("{addr}/v1/auth/cert/login");
        let body = match &self.config.cert_role {
            Some(role) => serde_json::json!({ "name": role }),
            None => serde_json::json!({}),
        };

        let response = send(http.post(&url).json(&body))?;
        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(VaultError::auth_failed(error_text(response)));
            }
            s if s.is_server_error() => {
                return Err(VaultError::unavailable(error_text(response)));
            }
            _ => return Err(VaultError::Operation(error_text(response))),
        }

        let text = response
            .text()
            .map_err(|e| VaultError::Operation(e.to_string()))?;
        let auth = serde_json::from_str::<AuthResponse>(&text)?
            .auth
            .filter(|a| !a.client_token.is_empty())
            .ok_or_else(|| VaultError::auth_failed("invalid or missing token"))?;

        info!(
            ttl_secs = auth.lease_duration,
            policies = ?auth.policies,
            "Authenticated with Vault"
        );

        Ok(VaultSession {
            addr,
            token: SecretString::from(auth.client_token),
            http,
        })
    }

    #[instrument(skip(self, session), fields(addr = %session.addr))]
    fn read_secret(
        &self,
        session: &VaultSession,
        path: &str,
        mount_point: &str,
    ) -> VaultResult<HashMap<String, String>> {
        let path = path.trim_matches('/');
        let mount_point = mount_point.trim_matches('/');
        if path.is_empty() {
            return Err(VaultError::InvalidRequest("secret path is empty".to_string()));
        }
        if mount_point.is_empty() {
            return Err(VaultError::InvalidRequest("mount point is empty".to_string()));
        }

        debug!("Reading secret");
        let url = format!("{}/v1/{mount_point}/data/{path}", session.addr);
        let response = send(
            session
                .http
                .get(&url)
                .header("X-Vault-Token", session.token.expose_secret()),
        )?;

        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(VaultError::invalid_path(path)),
            StatusCode::BAD_REQUEST => {
                return Err(VaultError::InvalidRequest(error_text(response)));
            }
            StatusCode::FORBIDDEN => {
                debug!("Vault denied read");
                return Err(VaultError::PermissionDenied(path.to_string()));
            }
            s if s.is_server_error() => {
                return Err(VaultError::unavailable(error_text(response)));
            }
            _ => return Err(VaultError::Operation(error_text(response))),
        }

        let text = response
            .text()
            .map_err(|e| VaultError::Operation(e.to_string()))?;
        let kv: KvResponse = serde_json::from_str(&text)?;
        if let Some(meta) = &kv.data.metadata {
            debug!(version = meta.version, destroyed = meta.destroyed, "Secret metadata");
        }

        let data = kv
            .data
            .data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| VaultError::invalid_path(format!("No data found at path: {path}")))?;

        Ok(flatten(data))
    }
}
