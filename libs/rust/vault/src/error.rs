//! Vault error types using thiserror 2.0.
//!
//! Each failure mode of the secret backend gets its own variant so callers
//! can tell an unreachable server from a bad path or a refused login.

use rust_common::PlatformError;
use thiserror::Error;

/// Vault-specific errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Vault server unreachable, sealed or answering with 5xx
    #[error("Vault server unavailable: {0}")]
    Unavailable(String),

    /// Certificate login refused or no token issued
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Nothing stored at the requested path
    #[error("Invalid secret path: {0}")]
    InvalidPath(String),

    /// Request rejected as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Token lacks a policy for the path
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other unexpected answer from Vault
    #[error("Vault operation failed: {0}")]
    Operation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Platform(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Vault server unavailable: connection refused");

        let err = VaultError::invalid_path("smtp/relay");
        assert_eq!(err.to_string(), "Invalid secret path: smtp/relay");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(VaultError::unavailable("timeout").is_retryable());
        assert!(!VaultError::invalid_path("path").is_retryable());
        assert!(!VaultError::auth_failed("bad cert").is_retryable());
        assert!(!VaultError::invalid_config("no key").is_retryable());
    }

    #[test]
    fn test_from_platform_error() {
        let platform_err = PlatformError::invalid_input("bad pem");
        let vault_err: VaultError = platform_err.into();
        assert!(matches!(vault_err, VaultError::Platform(_)));
        assert_eq!(vault_err.to_string(), "Invalid input: bad pem");
    }
}
