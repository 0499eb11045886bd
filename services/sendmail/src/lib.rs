//! sendmail library.
//!
//! Resolves SMTP credentials from the environment, a login file or Vault,
//! builds a multipart message and delivers it over STARTTLS.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod message;

// Re-exports for convenience
pub use app::{run, run_with};
pub use config::{BodySource, CredentialSources, RemoteSecret, SendOptions, ServerTarget};
pub use credentials::Credentials;
pub use dispatch::{Dispatcher, SmtpConnector, SmtpSession, SmtpStep};
pub use error::{SendmailError, SendmailResult};
pub use message::{Attachment, Message, MessagePart};
