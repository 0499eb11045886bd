//! HashiCorp Vault client for sendmail.
//!
//! Logs in with a TLS client certificate and reads KV v2 secrets as flat
//! string maps.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod secrets;

pub use client::{VaultClient, VaultSession};
pub use config::{ClientCertificate, DEFAULT_MOUNT_POINT, VaultConfig};
pub use error::{VaultError, VaultResult};
pub use provider::SecretStore;
