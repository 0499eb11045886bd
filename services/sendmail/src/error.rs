//! Error taxonomy for the send pipeline.
//!
//! Every failure aborts the run. `main` turns the error into one line on
//! stderr and a kind-specific exit code.

use crate::dispatch::SmtpStep;
use std::path::PathBuf;
use thiserror::Error;
use vault_client::VaultError;

/// Boxed cause carried by delivery failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving inputs or delivering the mail.
#[derive(Error, Debug)]
pub enum SendmailError {
    /// No credential source, or a mutually exclusive pair given both/neither
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Referenced login, body or attachment file does not exist
    #[error("Could not find file {}", path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// Credential content is not `login:password`
    #[error("Format error: {0}")]
    Format(String),

    /// Sender or recipient is not a valid mailbox
    #[error("Invalid {field} address {value:?}: {source}")]
    InvalidAddress {
        /// `sender` or `recipient`
        field: &'static str,
        /// Rejected input
        value: String,
        /// Parser error
        #[source]
        source: lettre::address::AddressError,
    },

    /// File exists but could not be read
    #[error("Could not read file {}: {source}", path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Remote secret backend failed
    #[error("Could not fetch secret {path}: {source}")]
    SecretStore {
        /// Secret path that was requested
        path: String,
        /// Backend error
        #[source]
        source: VaultError,
    },

    /// SMTP session failed
    #[error("An error occurred while sending the mail ({step}): {source}")]
    Delivery {
        /// Protocol step that failed
        step: SmtpStep,
        /// Underlying cause
        #[source]
        source: BoxError,
    },
}

/// Result type for the send pipeline.
pub type SendmailResult<T> = Result<T, SendmailError>;

impl SendmailError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a format error.
    #[must_use]
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Wrap a secret backend failure.
    #[must_use]
    pub fn secret_store(path: impl Into<String>, source: VaultError) -> Self {
        Self::SecretStore {
            path: path.into(),
            source,
        }
    }

    /// Wrap a delivery failure at `step`.
    #[must_use]
    pub fn delivery(step: SmtpStep, source: impl Into<BoxError>) -> Self {
        Self::Delivery {
            step,
            source: source.into(),
        }
    }

    /// Process exit code for this error kind.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) | Self::InvalidAddress { .. } => 2,
            Self::NotFound { .. } => 3,
            Self::Format(_) | Self::Io { .. } => 4,
            Self::SecretStore { .. } => 5,
            Self::Delivery { .. } => 6,
        }
    }
}
