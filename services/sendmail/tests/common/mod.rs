//! Scripted SMTP connector shared by the integration tests.

#![allow(dead_code)]

use sendmail::error::BoxError;
use sendmail::{Credentials, Message, ServerTarget, SmtpConnector, SmtpSession, SmtpStep};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Something the fake session was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect { host: String, port: u16 },
    StartTls,
    Authenticate { login: String },
    Transmit { attachments: usize },
    Close,
}

/// Connector whose sessions record every call and fail at a chosen step.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    fail_at: Option<SmtpStep>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(step: SmtpStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct FakeSession {
    connector: FakeConnector,
}

impl FakeSession {
    fn step(&self, step: SmtpStep, event: Event) -> Result<(), BoxError> {
        self.connector.push(event);
        if self.connector.fail_at == Some(step) {
            return Err(format!("scripted {step} failure").into());
        }
        Ok(())
    }
}

impl SmtpSession for FakeSession {
    fn starttls(&mut self) -> Result<(), BoxError> {
        self.step(SmtpStep::StartTls, Event::StartTls)
    }

    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), BoxError> {
        self.step(
            SmtpStep::Authenticate,
            Event::Authenticate {
                login: credentials.login().to_string(),
            },
        )
    }

    fn transmit(&mut self, message: &Message) -> Result<String, BoxError> {
        self.step(
            SmtpStep::Transmit,
            Event::Transmit {
                attachments: message.attachments().len(),
            },
        )?;
        Ok("250".to_string())
    }

    fn close(&mut self) {
        self.connector.push(Event::Close);
    }
}

impl SmtpConnector for FakeConnector {
    type Session = FakeSession;

    fn connect(&self, target: &ServerTarget, _timeout: Duration) -> Result<FakeSession, BoxError> {
        self.push(Event::Connect {
            host: target.host.clone(),
            port: target.port,
        });
        if self.fail_at == Some(SmtpStep::Connect) {
            return Err("connection refused".into());
        }
        Ok(FakeSession {
            connector: self.clone(),
        })
    }
}
