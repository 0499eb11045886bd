//! Blocking HTTP client configuration and building.
//!
//! The sendmail tool is a single-shot, single-threaded process, so every
//! client built here is a `reqwest::blocking::Client`. Client certificates
//! are supplied as PEM material and attached as a TLS identity.

use crate::PlatformError;
use reqwest::Identity;
use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("sendmail/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with custom timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a new HTTP config with custom connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// PEM-encoded client certificate and private key.
#[derive(Clone)]
pub struct PemIdentity {
    cert: Vec<u8>,
    key: Vec<u8>,
}

impl std::fmt::Debug for PemIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PemIdentity")
            .field("cert_len", &self.cert.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl PemIdentity {
    /// Wrap certificate and key PEM bytes.
    #[must_use]
    pub const fn new(cert: Vec<u8>, key: Vec<u8>) -> Self {
        Self { cert, key }
    }

    fn to_identity(&self) -> Result<Identity, PlatformError> {
        if self.cert.is_empty() || self.key.is_empty() {
            return Err(PlatformError::invalid_input(
                "client certificate and key must not be empty",
            ));
        }
        let mut bundle = Vec::with_capacity(self.cert.len() + self.key.len() + 1);
        bundle.extend_from_slice(&self.cert);
        if !bundle.ends_with(b"\n") {
            bundle.push(b'\n');
        }
        bundle.extend_from_slice(&self.key);
        Identity::from_pem(&bundle).map_err(PlatformError::Http)
    }
}

/// Build a configured blocking HTTP client.
///
/// Uses rustls with the bundled web PKI roots. When `identity` is given it
/// is presented during the TLS handshake.
///
/// # Errors
///
/// Returns an error if the identity cannot be parsed or the client cannot
/// be built.
///
/// Must not be called from inside an async runtime thread; use
/// `spawn_blocking` there.
pub fn build_http_client(
    config: &HttpConfig,
    identity: Option<&PemIdentity>,
) -> Result<Client, PlatformError> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    if let Some(identity) = identity {
        builder = builder.identity(identity.to_identity()?);
    }

    builder.build().map_err(PlatformError::Http)
}
