//! Vault client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default KV v2 mount point.
pub const DEFAULT_MOUNT_POINT: &str = "kv";

/// Vault client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Name of the certificate role to log in as; Vault picks a matching
    /// role when unset
    pub cert_role: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cert_role: None,
        }
    }
}

impl VaultConfig {
    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the certificate role used at login.
    #[must_use]
    pub fn with_cert_role(mut self, role: impl Into<String>) -> Self {
        self.cert_role = Some(role.into());
        self
    }
}

/// Paths to the PEM client certificate and key used for TLS certificate
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    /// PEM certificate chain
    pub cert_path: PathBuf,
    /// PEM private key
    pub key_path: PathBuf,
}

impl ClientCertificate {
    /// Create from certificate and key paths.
    #[must_use]
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.cert_role.is_none());
    }

    #[test]
    fn test_builder() {
        let config = VaultConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_cert_role("smtp-relay");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cert_role.as_deref(), Some("smtp-relay"));
    }
}
