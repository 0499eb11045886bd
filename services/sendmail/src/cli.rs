//! Command-line surface.

use crate::config::{
    CredentialSources, DEFAULT_SMTP_PORT, RemoteSecret, SASL_LOGIN_ENV, SendOptions, ServerTarget,
};
use clap::{ArgGroup, Parser};
use rust_common::TracingConfig;
use secrecy::SecretString;
use std::path::PathBuf;
use vault_client::{ClientCertificate, DEFAULT_MOUNT_POINT, VaultConfig};

/// Sends mails over an authenticated SMTP service.
#[derive(Debug, Parser)]
#[command(name = "sendmail", version, about)]
#[command(group(ArgGroup::new("body").required(true).args(["message", "message_file"])))]
pub struct Cli {
    /// Host name of the SMTP server
    #[arg(short = 'S', long = "smtp_server", visible_alias = "smtp-server")]
    pub smtp_server: String,

    /// SMTP submission port
    #[arg(short = 'P', long, default_value_t = DEFAULT_SMTP_PORT)]
    pub port: u16,

    /// Sender e-mail
    #[arg(short = 'f', long = "from_mail", visible_alias = "from-mail")]
    pub from_mail: String,

    /// Recipient e-mail
    #[arg(short = 't', long = "to_mail", visible_alias = "to-mail")]
    pub to_mail: String,

    /// Mail subject
    #[arg(short = 's', long)]
    pub subject: String,

    /// Message body
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// A file which holds the body of the mail
    #[arg(short = 'M', long = "message_file", visible_alias = "message-file")]
    pub message_file: Option<PathBuf>,

    /// Path to a file which holds login:password
    #[arg(short = 'L', long = "login_file", visible_alias = "login-file")]
    pub login_file: Option<PathBuf>,

    /// File to attach; repeat the flag or separate paths with commas
    #[arg(
        short = 'a',
        long = "attach_file",
        visible_alias = "attach-file",
        alias = "attach_files",
        value_delimiter = ','
    )]
    pub attach_files: Vec<String>,

    /// Vault address followed by the secret field, e.g. https://vault:8200/smtp.
    /// Ignored unless --hashisecret is also given
    #[arg(long)]
    pub hashiurl: Option<String>,

    /// Path of the secret in Vault. Ignored unless --hashiurl is also given
    #[arg(long)]
    pub hashisecret: Option<String>,

    /// KV v2 mount point of the secret
    #[arg(long = "mount_point", visible_alias = "mount-point", default_value = DEFAULT_MOUNT_POINT)]
    pub mount_point: String,

    /// Client certificate for Vault login
    #[arg(long = "vault_cert", env = "VAULT_CERT")]
    pub vault_cert: Option<PathBuf>,

    /// Client key for Vault login
    #[arg(long = "vault_key", env = "VAULT_KEY")]
    pub vault_key: Option<PathBuf>,

    /// Vault certificate role to log in as
    #[arg(long = "vault_role", env = "VAULT_ROLE")]
    pub vault_role: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Tracing settings from the logging flags.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::default().with_log_level(&self.log_level);
        if self.log_json {
            config.with_json_output()
        } else {
            config
        }
    }

    /// Convert into pipeline options. `env_login` is the value of the
    /// credentials environment variable, if set.
    #[must_use]
    pub fn into_options(self, env_login: Option<String>) -> SendOptions {
        let certificate = match (self.vault_cert, self.vault_key) {
            (Some(cert), Some(key)) => Some(ClientCertificate::new(cert, key)),
            _ => None,
        };

        let remote = match (self.hashiurl, self.hashisecret) {
            (Some(url), Some(secret)) => {
                let mut remote = RemoteSecret::new(secret, url).with_mount_point(self.mount_point);
                remote.certificate = certificate;
                Some(remote)
            }
            _ => None,
        };

        let mut vault = VaultConfig::default();
        if let Some(role) = self.vault_role {
            vault = vault.with_cert_role(role);
        }

        let attachments = self
            .attach_files
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();

        let mut options = SendOptions::new(
            ServerTarget::new(self.smtp_server).with_port(self.port),
            self.from_mail,
            self.to_mail,
            self.subject,
        );
        options.message = self.message;
        options.message_file = self.message_file;
        options.attachments = attachments;
        options.credentials = CredentialSources {
            env_login: env_login.map(SecretString::from),
            login_file: self.login_file,
            remote,
        };
        options.vault = vault;
        options
    }
}

/// Read the credentials environment variable.
#[must_use]
pub fn env_login() -> Option<String> {
    std::env::var(SASL_LOGIN_ENV).ok()
}
