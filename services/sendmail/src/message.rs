//! Multipart message assembly.

use crate::error::{SendmailError, SendmailResult};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use std::path::Path;

/// MIME type given to every attachment.
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file to attach, read once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Base name of the source file
    pub filename: String,
    /// File bytes
    pub content: Vec<u8>,
}

impl Attachment {
    /// Attachment from in-memory bytes.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Read `path` and name the attachment after its base name.
    ///
    /// # Errors
    ///
    /// `NotFound` when the path does not exist, `Io` when it cannot be read.
    pub fn from_path(path: &Path) -> SendmailResult<Self> {
        if !path.exists() {
            return Err(SendmailError::not_found(path));
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SendmailError::config(format!("attachment {} has no file name", path.display()))
            })?;
        let content = std::fs::read(path).map_err(|source| SendmailError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { filename, content })
    }
}

/// One content part of a built message, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePart<'a> {
    /// The plain text body
    Text(&'a str),
    /// An opaque binary attachment
    Attachment {
        /// Attachment file name
        filename: &'a str,
        /// MIME type
        content_type: &'static str,
        /// Bytes
        content: &'a [u8],
    },
}

/// An immutable mail ready for delivery.
#[derive(Debug, Clone)]
pub struct Message {
    from: Mailbox,
    to: Mailbox,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    email: lettre::Message,
}

fn parse_mailbox(field: &'static str, value: &str) -> SendmailResult<Mailbox> {
    value
        .parse()
        .map_err(|source| SendmailError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}

impl Message {
    /// Assemble a `multipart/mixed` message: the text body first, then each
    /// attachment in the order given.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` when the sender or recipient does not parse.
    pub fn build(
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
        attachments: Vec<Attachment>,
    ) -> SendmailResult<Self> {
        let from = parse_mailbox("sender", sender)?;
        let to = parse_mailbox("recipient", recipient)?;
        let octet_stream = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
            .map_err(|e| SendmailError::format(format!("attachment content type: {e}")))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
        for attachment in &attachments {
            multipart = multipart.singlepart(
                lettre::message::Attachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), octet_stream.clone()),
            );
        }

        let email = lettre::Message::builder()
            .from(from.clone())
            .to(to.clone())
            .subject(subject)
            .multipart(multipart)
            .map_err(|e| SendmailError::format(format!("cannot assemble message: {e}")))?;

        Ok(Self {
            from,
            to,
            subject: subject.to_string(),
            body: body.to_string(),
            attachments,
            email,
        })
    }

    /// Sender mailbox.
    #[must_use]
    pub const fn sender(&self) -> &Mailbox {
        &self.from
    }

    /// Recipient mailbox.
    #[must_use]
    pub const fn recipient(&self) -> &Mailbox {
        &self.to
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Content parts in wire order: one text part, then the attachments.
    #[must_use]
    pub fn parts(&self) -> Vec<MessagePart<'_>> {
        std::iter::once(MessagePart::Text(&self.body))
            .chain(self.attachments.iter().map(|a| MessagePart::Attachment {
                filename: &a.filename,
                content_type: ATTACHMENT_CONTENT_TYPE,
                content: &a.content,
            }))
            .collect()
    }

    /// SMTP envelope derived from the headers.
    #[must_use]
    pub fn envelope(&self) -> &lettre::address::Envelope {
        self.email.envelope()
    }

    /// RFC 5322 encoding of the message.
    #[must_use]
    pub fn formatted(&self) -> Vec<u8> {
        self.email.formatted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_message() {
        let msg = Message::build("alice@example.com", "bob@example.com", "Hi", "Hello", vec![])
            .unwrap();
        assert_eq!(msg.parts(), vec![MessagePart::Text("Hello")]);
        assert_eq!(msg.subject(), "Hi");
        assert_eq!(msg.sender().email.to_string(), "alice@example.com");
        assert_eq!(msg.recipient().email.to_string(), "bob@example.com");

        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Subject: Hi"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("Hello"));
    }

    #[test]
    fn test_attachment_headers() {
        let msg = Message::build(
            "alice@example.com",
            "bob@example.com",
            "Report",
            "See attached",
            vec![Attachment::new("report.csv", b"a,b\n1,2\n".to_vec())],
        )
        .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Content-Type: application/octet-stream"));
        assert!(raw.contains("Content-Disposition: attachment; filename=\"report.csv\""));
    }

    #[test]
    fn test_envelope_matches_headers() {
        let msg = Message::build("alice@example.com", "bob@example.com", "Hi", "x", vec![])
            .unwrap();
        let envelope = msg.envelope();
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("alice@example.com")
        );
        assert_eq!(envelope.to().len(), 1);
    }

    #[test]
    fn test_invalid_sender() {
        let err = Message::build("not an address", "bob@example.com", "Hi", "x", vec![])
            .unwrap_err();
        assert!(matches!(err, SendmailError::InvalidAddress { field: "sender", .. }));
    }

    #[test]
    fn test_from_path_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.filename, "invoice.pdf");
        assert_eq!(attachment.content, b"%PDF-1.4");
    }

    #[test]
    fn test_from_path_missing() {
        let err = Attachment::from_path(Path::new("/nonexistent/a.bin")).unwrap_err();
        assert!(matches!(err, SendmailError::NotFound { .. }));
    }
}
