//! Secret store capability.
//!
//! The sendmail resolver only needs two operations from a secret backend:
//! log in with a client certificate and read one KV v2 secret. Keeping them
//! behind a trait lets tests substitute an in-memory store.

use crate::config::ClientCertificate;
use crate::error::VaultResult;
use std::collections::HashMap;

/// A remote key/value secret backend.
pub trait SecretStore {
    /// Authenticated handle returned by [`SecretStore::authenticate`].
    type Session;

    /// Log in to the backend at `addr` using TLS client certificate auth.
    ///
    /// # Errors
    ///
    /// Fails when the certificate cannot be loaded, the backend is
    /// unreachable or the login is refused.
    fn authenticate(&self, addr: &str, certificate: &ClientCertificate)
    -> VaultResult<Self::Session>;

    /// Read the latest version of the secret at `path` under `mount_point`.
    ///
    /// # Errors
    ///
    /// Fails when the path holds no data, the token is not allowed to read
    /// it, or the backend is unreachable.
    fn read_secret(
        &self,
        session: &Self::Session,
        path: &str,
        mount_point: &str,
    ) -> VaultResult<HashMap<String, String>>;
}
