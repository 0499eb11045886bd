//! Options handed from the command line to the send pipeline.
//!
//! Everything the core needs arrives through [`SendOptions`]; nothing below
//! this module reads the process environment.

use crate::error::{SendmailError, SendmailResult};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use vault_client::{ClientCertificate, DEFAULT_MOUNT_POINT, VaultConfig};

/// Submission port used when none is given.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Environment variable holding `login:password`.
pub const SASL_LOGIN_ENV: &str = "AWS_SASL_LOGIN";

/// SMTP server coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    /// Host name, also used for TLS certificate verification
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl ServerTarget {
    /// Target on the default submission port.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SMTP_PORT,
        }
    }

    /// Override the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Remote secret coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSecret {
    /// Path of the KV v2 secret under the mount point
    pub secret_path: String,
    /// Vault address with the secret field appended as the last segment,
    /// e.g. `https://vault:8200/smtp`
    pub vault_url: String,
    /// KV v2 mount point
    pub mount_point: String,
    /// Client certificate used to log in
    pub certificate: Option<ClientCertificate>,
}

impl RemoteSecret {
    /// Remote secret on the default mount point, without certificate.
    #[must_use]
    pub fn new(secret_path: impl Into<String>, vault_url: impl Into<String>) -> Self {
        Self {
            secret_path: secret_path.into(),
            vault_url: vault_url.into(),
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            certificate: None,
        }
    }

    /// Override the mount point.
    #[must_use]
    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.mount_point = mount_point.into();
        self
    }

    /// Set the client certificate.
    #[must_use]
    pub fn with_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Split the vault URL on its last `/` into the Vault address and the
    /// field name to look up in the secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the field is empty or the address
    /// has no scheme and host, as in `https://vault:8200` without a field.
    pub fn decompose(&self) -> SendmailResult<(&str, &str)> {
        let has_host = |addr: &str| {
            addr.split_once("://")
                .is_some_and(|(scheme, host)| !scheme.is_empty() && !host.is_empty())
        };
        match self.vault_url.rsplit_once('/') {
            Some((addr, key)) if has_host(addr) && !key.is_empty() => Ok((addr, key)),
            _ => Err(SendmailError::config(format!(
                "vault URL {:?} must have the form <vault address>/<secret field>",
                self.vault_url
            ))),
        }
    }
}

/// Every credential input the command line may have supplied.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    /// Value of the credentials environment variable
    pub env_login: Option<SecretString>,
    /// Path to a `login:password` file
    pub login_file: Option<PathBuf>,
    /// Remote secret coordinates
    pub remote: Option<RemoteSecret>,
}

/// The one credential source chosen for a run.
#[derive(Debug, Clone, Copy)]
pub enum CredentialSource<'a> {
    /// `login:password` taken from the environment
    EnvVar(&'a SecretString),
    /// File holding `login:password`
    LoginFile(&'a Path),
    /// KV v2 secret in Vault
    RemoteSecret(&'a RemoteSecret),
}

impl CredentialSources {
    /// Pick the first configured source in the fixed order environment,
    /// login file, remote secret. Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no source is configured.
    pub fn select(&self) -> SendmailResult<CredentialSource<'_>> {
        if let Some(env) = self
            .env_login
            .as_ref()
            .filter(|v| !v.expose_secret().is_empty())
        {
            return Ok(CredentialSource::EnvVar(env));
        }
        if let Some(path) = &self.login_file {
            return Ok(CredentialSource::LoginFile(path));
        }
        if let Some(remote) = &self.remote {
            return Ok(CredentialSource::RemoteSecret(remote));
        }
        Err(SendmailError::config(format!(
            "--login_file, --hashiurl and --hashisecret or {SASL_LOGIN_ENV} as env needs to be set"
        )))
    }
}

/// Where the mail body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// Body given on the command line
    Literal(String),
    /// File holding the body
    File(PathBuf),
}

impl BodySource {
    /// Produce the body text. File bodies are trimmed.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` when the file does not exist.
    pub fn read(&self) -> SendmailResult<String> {
        match self {
            Self::Literal(text) => Ok(text.clone()),
            Self::File(path) => {
                if !path.exists() {
                    return Err(SendmailError::not_found(path));
                }
                std::fs::read_to_string(path)
                    .map(|body| body.trim().to_string())
                    .map_err(|source| SendmailError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Validated options for one send.
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// SMTP server
    pub target: ServerTarget,
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Literal body
    pub message: Option<String>,
    /// Body file
    pub message_file: Option<PathBuf>,
    /// Files to attach, in order
    pub attachments: Vec<PathBuf>,
    /// Credential inputs
    pub credentials: CredentialSources,
    /// Vault client settings
    pub vault: VaultConfig,
}

impl SendOptions {
    /// Options with the required fields and nothing else set.
    #[must_use]
    pub fn new(
        target: ServerTarget,
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            target,
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            message: None,
            message_file: None,
            attachments: Vec::new(),
            credentials: CredentialSources::default(),
            vault: VaultConfig::default(),
        }
    }

    /// Exactly one of `message` and `message_file`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when both or neither are set.
    pub fn body_source(&self) -> SendmailResult<BodySource> {
        match (&self.message, &self.message_file) {
            (Some(text), None) => Ok(BodySource::Literal(text.clone())),
            (None, Some(path)) => Ok(BodySource::File(path.clone())),
            (Some(_), Some(_)) => Err(SendmailError::config(
                "--message and --message_file are mutually exclusive",
            )),
            (None, None) => Err(SendmailError::config(
                "--message_file or --message needs to be given",
            )),
        }
    }
}
