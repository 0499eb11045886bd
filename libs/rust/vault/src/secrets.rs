//! Wire types for the Vault HTTP API.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Vault KV v2 read response wrapper
#[derive(Debug, Deserialize)]
pub struct KvResponse {
    /// Secret payload and version metadata
    pub data: KvData,
}

/// Body of a KV v2 read
#[derive(Debug, Deserialize)]
pub struct KvData {
    /// `null` when the latest version was deleted
    pub data: Option<HashMap<String, Value>>,
    /// Version metadata
    pub metadata: Option<KvMetadata>,
}

/// Version metadata of a KV v2 secret
#[derive(Debug, Deserialize)]
pub struct KvMetadata {
    /// Secret version
    pub version: u32,
    /// Whether the version was destroyed
    #[serde(default)]
    pub destroyed: bool,
}

/// Vault auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// Login result, absent on failure
    pub auth: Option<AuthData>,
}

/// Token issued by a successful login
#[derive(Debug, Deserialize)]
pub struct AuthData {
    /// Vault token
    pub client_token: String,
    /// Policies attached to the token
    #[serde(default)]
    pub policies: Vec<String>,
    /// Token TTL in seconds
    #[serde(default)]
    pub lease_duration: u64,
}

/// Error body returned by Vault on non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Error messages
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Parse a body, falling back to the raw text.
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
            _ => body.trim().to_string(),
        }
    }
}

/// Flatten KV values into strings. Non-string JSON values keep their JSON
/// rendering.
pub fn flatten(data: HashMap<String, Value>) -> HashMap<String, String> {
    data.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}
