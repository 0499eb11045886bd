//! Shared library for cross-cutting concerns in the sendmail workspace.
//!
//! This crate provides:
//! - Error types with retryability classification
//! - Blocking HTTP client configuration with client-certificate identities
//! - Tracing subscriber initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod tracing_config;

pub use error::PlatformError;
pub use http::{HttpConfig, PemIdentity, build_http_client};
pub use tracing_config::{TracingConfig, init_tracing};
