//! Centralized error types for the workspace libraries.
//!
//! Lower-level failures (HTTP transport, local I/O, malformed input) are
//! collected here so that the vault client and the sendmail service can
//! wrap them without depending on each other's error enums.

use thiserror::Error;

/// Common error type for platform operations.
///
/// Errors are classified as either retryable (transient backend trouble)
/// or non-retryable (hard rejection).
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timeout occurred
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl PlatformError {
    /// Check if this error is retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err = PlatformError::Timeout("vault login".to_string());
    /// assert!(err.is_retryable());
    ///
    /// let err = PlatformError::invalid_input("bad pem");
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Timeout(_) => true,
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PlatformError::unavailable("test").is_retryable());
        assert!(PlatformError::Timeout("test".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!PlatformError::invalid_input("test").is_retryable());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!PlatformError::from(io).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = PlatformError::unavailable("vault");
        assert_eq!(err.to_string(), "Service unavailable: vault");

        let err = PlatformError::invalid_input("empty certificate");
        assert_eq!(err.to_string(), "Invalid input: empty certificate");
    }
}
