//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use vault_client::{ClientCertificate, SecretStore, VaultError, VaultResult};

/// A call observed by [`MockSecretStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `authenticate(addr, certificate)`
    Authenticate {
        /// Vault address
        addr: String,
        /// Certificate presented
        certificate: ClientCertificate,
    },
    /// `read_secret(path, mount_point)`
    ReadSecret {
        /// Secret path
        path: String,
        /// Mount point
        mount_point: String,
    },
}

/// Failure to inject into [`MockSecretStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Login refused
    AuthenticationFailed,
    /// Backend unreachable
    Unavailable,
}

impl MockFailure {
    fn to_error(self) -> VaultError {
        match self {
            Self::AuthenticationFailed => VaultError::auth_failed("mock login refused"),
            Self::Unavailable => VaultError::unavailable("mock vault down"),
        }
    }
}

/// Session handed out by [`MockSecretStore`].
#[derive(Debug, Clone)]
pub struct MockSession {
    /// Address the session was opened against
    pub addr: String,
}

/// In-memory secret store keyed by `(mount_point, path)`.
#[derive(Debug, Default)]
pub struct MockSecretStore {
    secrets: HashMap<(String, String), HashMap<String, String>>,
    login_failure: Option<MockFailure>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockSecretStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a secret field.
    #[must_use]
    pub fn with_secret(
        mut self,
        mount_point: &str,
        path: &str,
        key: &str,
        value: &str,
    ) -> Self {
        self.secrets
            .entry((mount_point.to_string(), path.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make every login fail.
    #[must_use]
    pub const fn with_login_failure(mut self, failure: MockFailure) -> Self {
        self.login_failure = Some(failure);
        self
    }

    /// All calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, call: StoreCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl SecretStore for MockSecretStore {
    type Session = MockSession;

    fn authenticate(
        &self,
        addr: &str,
        certificate: &ClientCertificate,
    ) -> VaultResult<MockSession> {
        self.record(StoreCall::Authenticate {
            addr: addr.to_string(),
            certificate: certificate.clone(),
        });
        if let Some(failure) = self.login_failure {
            return Err(failure.to_error());
        }
        Ok(MockSession {
            addr: addr.to_string(),
        })
    }

    fn read_secret(
        &self,
        _session: &MockSession,
        path: &str,
        mount_point: &str,
    ) -> VaultResult<HashMap<String, String>> {
        self.record(StoreCall::ReadSecret {
            path: path.to_string(),
            mount_point: mount_point.to_string(),
        });
        self.secrets
            .get(&(mount_point.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| VaultError::invalid_path(format!("No data found at path: {path}")))
    }
}
