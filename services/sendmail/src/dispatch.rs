//! SMTP delivery over a STARTTLS-upgraded, authenticated session.
//!
//! The protocol runs in a fixed order: connect and greet, upgrade to TLS
//! and greet again, authenticate, transmit. The first failing step aborts
//! the rest. The session sits in a [`SessionGuard`] so it is closed on
//! every exit path.

use crate::config::ServerTarget;
use crate::credentials::Credentials;
use crate::error::{BoxError, SendmailError, SendmailResult};
use crate::message::Message;
use lettre::transport::smtp::authentication::{Credentials as SmtpAuth, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use secrecy::ExposeSecret;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Connect and read timeout for the whole SMTP session.
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// SASL mechanisms offered, in preference order.
const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// Protocol step, reported with delivery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpStep {
    /// TCP connect, server greeting and first EHLO
    Connect,
    /// STARTTLS, TLS handshake and second EHLO
    StartTls,
    /// SASL authentication
    Authenticate,
    /// MAIL FROM / RCPT TO / DATA
    Transmit,
}

impl fmt::Display for SmtpStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::StartTls => "starttls",
            Self::Authenticate => "authenticate",
            Self::Transmit => "transmit",
        })
    }
}

/// An open SMTP session.
pub trait SmtpSession {
    /// Upgrade to TLS and re-send EHLO.
    ///
    /// # Errors
    ///
    /// Fails when the server does not offer STARTTLS or the handshake fails.
    fn starttls(&mut self) -> Result<(), BoxError>;

    /// Authenticate with the given credentials.
    ///
    /// # Errors
    ///
    /// Fails when the server rejects the credentials.
    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), BoxError>;

    /// Send the message; returns the server's reply code.
    ///
    /// # Errors
    ///
    /// Fails when the server rejects sender, recipient or content.
    fn transmit(&mut self, message: &Message) -> Result<String, BoxError>;

    /// Say QUIT and drop the connection. Must be idempotent and never fail.
    fn close(&mut self);
}

/// Opens SMTP sessions.
pub trait SmtpConnector {
    /// Session type produced.
    type Session: SmtpSession;

    /// Connect to `target`, read the greeting and send EHLO.
    ///
    /// # Errors
    ///
    /// Fails when the server cannot be reached or does not greet.
    fn connect(&self, target: &ServerTarget, timeout: Duration) -> Result<Self::Session, BoxError>;
}

/// Closes the wrapped session when dropped.
pub struct SessionGuard<S: SmtpSession>(S);

impl<S: SmtpSession> SessionGuard<S> {
    /// Take ownership of an open session.
    pub const fn new(session: S) -> Self {
        Self(session)
    }
}

impl<S: SmtpSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: SmtpSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: SmtpSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Sends one message per call.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    connector: C,
    timeout: Duration,
}

impl<C: SmtpConnector> Dispatcher<C> {
    /// Dispatcher with the fixed session timeout.
    pub const fn new(connector: C) -> Self {
        Self {
            connector,
            timeout: SMTP_TIMEOUT,
        }
    }

    /// Deliver `message` to `target` authenticated as `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `Delivery` naming the failed step and carrying its cause.
    #[instrument(skip_all, fields(host = %target.host, port = target.port))]
    pub fn send(
        &self,
        credentials: &Credentials,
        message: &Message,
        target: &ServerTarget,
    ) -> SendmailResult<()> {
        let session = self
            .connector
            .connect(target, self.timeout)
            .map_err(|e| fail(SmtpStep::Connect, e))?;
        let mut session = SessionGuard::new(session);
        debug!("Connected");

        session
            .starttls()
            .map_err(|e| fail(SmtpStep::StartTls, e))?;
        debug!("TLS established");

        session
            .authenticate(credentials)
            .map_err(|e| fail(SmtpStep::Authenticate, e))?;
        debug!(login = credentials.login(), "Authenticated");

        let code = session
            .transmit(message)
            .map_err(|e| fail(SmtpStep::Transmit, e))?;
        info!(
            code = %code,
            attachments = message.attachments().len(),
            "Message accepted by server"
        );
        Ok(())
    }
}

fn fail(step: SmtpStep, cause: BoxError) -> SendmailError {
    debug!(%step, error = %cause, "SMTP step failed");
    SendmailError::delivery(step, cause)
}

/// Production connector backed by lettre's blocking SMTP client.
#[derive(Debug, Clone, Default)]
pub struct LettreConnector {
    hello_name: ClientId,
}

impl LettreConnector {
    /// Connector announcing `hello_name` in EHLO.
    #[must_use]
    pub const fn with_hello_name(hello_name: ClientId) -> Self {
        Self { hello_name }
    }
}

impl SmtpConnector for LettreConnector {
    type Session = LettreSession;

    fn connect(&self, target: &ServerTarget, timeout: Duration) -> Result<LettreSession, BoxError> {
        let conn = SmtpConnection::connect(
            (target.host.as_str(), target.port),
            Some(timeout),
            &self.hello_name,
            None,
            None,
        )?;
        Ok(LettreSession {
            conn,
            host: target.host.clone(),
            hello_name: self.hello_name.clone(),
            closed: false,
        })
    }
}

/// An open lettre SMTP connection.
pub struct LettreSession {
    conn: SmtpConnection,
    host: String,
    hello_name: ClientId,
    closed: bool,
}

impl SmtpSession for LettreSession {
    fn starttls(&mut self) -> Result<(), BoxError> {
        let tls = TlsParameters::new(self.host.clone())?;
        self.conn.starttls(&tls, &self.hello_name)?;
        Ok(())
    }

    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), BoxError> {
        let auth = SmtpAuth::new(
            credentials.login().to_string(),
            credentials.password().expose_secret().to_string(),
        );
        self.conn.auth(AUTH_MECHANISMS, &auth)?;
        Ok(())
    }

    fn transmit(&mut self, message: &Message) -> Result<String, BoxError> {
        let response = self.conn.send(message.envelope(), &message.formatted())?;
        Ok(response.code().to_string())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.conn.has_broken() {
            self.conn.abort();
            return;
        }
        if let Err(e) = self.conn.quit() {
            debug!(error = %e, "QUIT failed, aborting connection");
            self.conn.abort();
        }
    }
}
