//! The send pipeline: credentials, body, attachments, message, delivery.

use crate::config::SendOptions;
use crate::credentials;
use crate::dispatch::{Dispatcher, LettreConnector, SmtpConnector};
use crate::error::SendmailResult;
use crate::message::{Attachment, Message};
use tracing::{debug, instrument};
use vault_client::{SecretStore, VaultClient};

/// Send one mail with the production Vault client and SMTP connector.
///
/// # Errors
///
/// Any resolution, build or delivery failure.
pub fn run(options: &SendOptions) -> SendmailResult<()> {
    let store = VaultClient::new(options.vault.clone());
    let dispatcher = Dispatcher::new(LettreConnector::default());
    run_with(options, &store, &dispatcher)
}

/// Send one mail with injected collaborators.
///
/// Input validation that needs no I/O runs first; every local file is read
/// before the SMTP connection is opened.
///
/// # Errors
///
/// Any resolution, build or delivery failure.
#[instrument(skip_all, fields(to = %options.to, attachments = options.attachments.len()))]
pub fn run_with<S, C>(
    options: &SendOptions,
    store: &S,
    dispatcher: &Dispatcher<C>,
) -> SendmailResult<()>
where
    S: SecretStore,
    C: SmtpConnector,
{
    let body_source = options.body_source()?;
    options.credentials.select()?;

    let credentials = credentials::resolve(&options.credentials, store)?;
    let body = body_source.read()?;
    let attachments = options
        .attachments
        .iter()
        .map(|path| Attachment::from_path(path))
        .collect::<SendmailResult<Vec<_>>>()?;
    debug!(count = attachments.len(), "Attachments loaded");

    let message = Message::build(
        &options.from,
        &options.to,
        &options.subject,
        &body,
        attachments,
    )?;

    dispatcher.send(&credentials, &message, &options.target)
}
