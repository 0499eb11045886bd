//! End-to-end send pipeline tests with injected collaborators.

mod common;

use common::{Event, FakeConnector};
use secrecy::SecretString;
use sendmail::{
    CredentialSources, Dispatcher, RemoteSecret, SendOptions, SendmailError, ServerTarget, run_with,
};
use test_utils::fixtures::FileFixture;
use test_utils::mocks::{MockFailure, MockSecretStore, StoreCall};
use vault_client::ClientCertificate;

fn options() -> SendOptions {
    let mut options = SendOptions::new(
        ServerTarget::new("smtp.example.com").with_port(2525),
        "alice@example.com",
        "bob@example.com",
        "Report",
    );
    options.message = Some("See attached".to_string());
    options
}

fn with_env(mut options: SendOptions, login: &str) -> SendOptions {
    options.credentials.env_login = Some(SecretString::from(login));
    options
}

#[test]
fn test_sends_with_env_credentials_and_attachments() {
    let fixture = FileFixture::new().unwrap();
    let mut opts = with_env(options(), "user:p@ss:word");
    opts.attachments = vec![
        fixture.write("a.txt", "alpha").unwrap(),
        fixture.write("b.pdf", b"%PDF").unwrap(),
    ];

    let connector = FakeConnector::new();
    let store = MockSecretStore::new();
    run_with(&opts, &store, &Dispatcher::new(connector.clone())).unwrap();

    assert_eq!(
        connector.events(),
        vec![
            Event::Connect {
                host: "smtp.example.com".to_string(),
                port: 2525,
            },
            Event::StartTls,
            Event::Authenticate {
                login: "user".to_string(),
            },
            Event::Transmit { attachments: 2 },
            Event::Close,
        ]
    );
    assert_eq!(store.call_count(), 0);
}

#[test]
fn test_missing_attachment_never_connects() {
    let fixture = FileFixture::new().unwrap();
    let mut opts = with_env(options(), "user:pw");
    opts.attachments = vec![
        fixture.write("present.txt", "x").unwrap(),
        fixture.missing("missing.pdf"),
    ];

    let connector = FakeConnector::new();
    let err = run_with(&opts, &MockSecretStore::new(), &Dispatcher::new(connector.clone()))
        .unwrap_err();

    assert!(matches!(&err, SendmailError::NotFound { path } if path.ends_with("missing.pdf")));
    assert!(connector.events().is_empty());
}

#[test]
fn test_missing_body_file_never_connects() {
    let fixture = FileFixture::new().unwrap();
    let mut opts = with_env(options(), "user:pw");
    opts.message = None;
    opts.message_file = Some(fixture.missing("body.txt"));

    let connector = FakeConnector::new();
    let err = run_with(&opts, &MockSecretStore::new(), &Dispatcher::new(connector.clone()))
        .unwrap_err();

    assert!(matches!(err, SendmailError::NotFound { .. }));
    assert!(connector.events().is_empty());
}

#[test]
fn test_no_credentials_touches_nothing() {
    let connector = FakeConnector::new();
    let store = MockSecretStore::new();
    let err = run_with(&options(), &store, &Dispatcher::new(connector.clone())).unwrap_err();

    assert!(matches!(err, SendmailError::Configuration(_)));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(store.call_count(), 0);
    assert!(connector.events().is_empty());
}

#[test]
fn test_body_checked_before_credentials() {
    let mut opts = options();
    opts.message = None;

    let store = MockSecretStore::new();
    let err = run_with(&opts, &store, &Dispatcher::new(FakeConnector::new())).unwrap_err();
    assert!(err.to_string().contains("--message"));
    assert_eq!(store.call_count(), 0);
}

#[test]
fn test_credentials_from_vault() {
    let mut opts = options();
    opts.credentials = CredentialSources {
        remote: Some(
            RemoteSecret::new("mail/relay", "https://vault.example.com:8200/smtp")
                .with_mount_point("secret")
                .with_certificate(ClientCertificate::new("c.pem", "k.pem")),
        ),
        ..CredentialSources::default()
    };
    let store = MockSecretStore::new().with_secret("secret", "mail/relay", "smtp", "relay:pw");
    let connector = FakeConnector::new();

    run_with(&opts, &store, &Dispatcher::new(connector.clone())).unwrap();

    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Authenticate {
                addr: "https://vault.example.com:8200".to_string(),
                certificate: ClientCertificate::new("c.pem", "k.pem"),
            },
            StoreCall::ReadSecret {
                path: "mail/relay".to_string(),
                mount_point: "secret".to_string(),
            },
        ]
    );
    assert_eq!(
        connector.count(&Event::Authenticate {
            login: "relay".to_string()
        }),
        1
    );
}

#[test]
fn test_vault_login_failure_never_connects() {
    let mut opts = options();
    opts.credentials.remote = Some(
        RemoteSecret::new("mail/relay", "https://vault:8200/smtp")
            .with_certificate(ClientCertificate::new("c.pem", "k.pem")),
    );
    let store = MockSecretStore::new().with_login_failure(MockFailure::AuthenticationFailed);
    let connector = FakeConnector::new();

    let err = run_with(&opts, &store, &Dispatcher::new(connector.clone())).unwrap_err();
    assert!(matches!(err, SendmailError::SecretStore { .. }));
    assert_eq!(err.exit_code(), 5);
    assert!(connector.events().is_empty());
}

#[test]
fn test_invalid_recipient_never_connects() {
    let mut opts = with_env(options(), "user:pw");
    opts.to = "not-an-address".to_string();
    let connector = FakeConnector::new();

    let err = run_with(&opts, &MockSecretStore::new(), &Dispatcher::new(connector.clone()))
        .unwrap_err();
    assert!(matches!(
        err,
        SendmailError::InvalidAddress {
            field: "recipient",
            ..
        }
    ));
    assert!(connector.events().is_empty());
}
