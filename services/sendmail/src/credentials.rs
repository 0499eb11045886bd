//! SMTP login resolution.
//!
//! Exactly one credential source is consulted per run, chosen by
//! [`CredentialSources::select`]. All sources carry the same
//! `login:password` shape, split on the first `:` only.

use crate::config::{CredentialSource, CredentialSources, RemoteSecret};
use crate::error::{SendmailError, SendmailResult};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::{debug, info, instrument};
use vault_client::{SecretStore, VaultError};
use zeroize::Zeroizing;

/// SMTP login and password. The password is never printed.
#[derive(Debug, Clone)]
pub struct Credentials {
    login: String,
    password: SecretString,
}

impl Credentials {
    /// Build from parts.
    ///
    /// # Errors
    ///
    /// Returns a format error when either part is empty.
    pub fn new(login: impl Into<String>, password: SecretString) -> SendmailResult<Self> {
        let login = login.into();
        if login.is_empty() {
            return Err(SendmailError::format("login is empty"));
        }
        if password.expose_secret().is_empty() {
            return Err(SendmailError::format("password is empty"));
        }
        Ok(Self { login, password })
    }

    /// Split `login:password` on the first `:`. The password may contain
    /// further colons; the login cannot.
    ///
    /// # Errors
    ///
    /// Returns a format error when there is no `:` or either side is empty.
    pub fn parse(raw: &str) -> SendmailResult<Self> {
        let (login, password) = raw
            .split_once(':')
            .ok_or_else(|| SendmailError::format("expected content of the form login:password"))?;
        Self::new(login, SecretString::from(password))
    }

    /// SMTP login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// SMTP password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

/// Resolve credentials from the first configured source.
///
/// `store` is only touched when the remote secret is the selected source.
///
/// # Errors
///
/// `Configuration` when nothing is configured, `NotFound` for a missing
/// login file, `Format` for malformed content and `SecretStore` for any
/// backend failure.
#[instrument(skip_all)]
pub fn resolve<S: SecretStore>(sources: &CredentialSources, store: &S) -> SendmailResult<Credentials> {
    match sources.select()? {
        CredentialSource::EnvVar(value) => {
            debug!("Using credentials from environment");
            Credentials::parse(value.expose_secret().trim())
        }
        CredentialSource::LoginFile(path) => {
            debug!(path = %path.display(), "Using credentials from login file");
            from_login_file(path)
        }
        CredentialSource::RemoteSecret(remote) => from_remote(remote, store),
    }
}

fn from_login_file(path: &Path) -> SendmailResult<Credentials> {
    if !path.exists() {
        return Err(SendmailError::not_found(path));
    }
    let content = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
        SendmailError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?);
    Credentials::parse(content.trim()).map_err(|e| match e {
        SendmailError::Format(msg) => {
            SendmailError::format(format!("login file {}: {msg}", path.display()))
        }
        other => other,
    })
}

fn from_remote<S: SecretStore>(remote: &RemoteSecret, store: &S) -> SendmailResult<Credentials> {
    let (addr, field) = remote.decompose()?;
    let path = remote.secret_path.as_str();
    let certificate = remote.certificate.as_ref().ok_or_else(|| {
        SendmailError::secret_store(
            path,
            VaultError::invalid_config("client certificate and key (VAULT_CERT, VAULT_KEY) must be set"),
        )
    })?;

    debug!(addr, path, mount = %remote.mount_point, "Using credentials from Vault");
    let session = store
        .authenticate(addr, certificate)
        .map_err(|e| SendmailError::secret_store(path, e))?;
    let data = store
        .read_secret(&session, path, &remote.mount_point)
        .map_err(|e| SendmailError::secret_store(path, e))?;

    let value = Zeroizing::new(data.get(field).cloned().ok_or_else(|| {
        SendmailError::secret_store(
            path,
            VaultError::invalid_path(format!("field {field:?} not present in {path}")),
        )
    })?);

    let credentials = Credentials::parse(&value).map_err(|e| match e {
        SendmailError::Format(msg) => {
            SendmailError::format(format!("secret {path} field {field:?}: {msg}"))
        }
        other => other,
    })?;
    info!(path, field, "Resolved SMTP credentials from Vault");
    Ok(credentials)
}
