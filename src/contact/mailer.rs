//! Outbound mail — SMTP via lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::config::MailConfig;
use crate::error::MailError;

/// An HTML email addressed to the configured recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub html: String,
}

/// Delivers contact emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP relay mailer. Sends from `"{company} <from_address>"` to the fixed
/// recipient.
pub struct SmtpMailer {
    config: MailConfig,
    sender_name: String,
}

impl SmtpMailer {
    pub fn new(config: MailConfig, sender_name: impl Into<String>) -> Self {
        Self {
            config,
            sender_name: sender_name.into(),
        }
    }

    /// Build the lettre message for `email`.
    pub fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let from = Mailbox::new(
            Some(self.sender_name.clone()),
            parse_address(&self.config.from_address)?,
        );
        let to = Mailbox::new(None, parse_address(&self.config.recipient)?);

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let host = self
            .config
            .smtp_host
            .as_deref()
            .ok_or(MailError::NotConfigured)?;

        let mut builder = SmtpTransport::relay(host)
            .map_err(|e| MailError::Send(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port);

        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.expose_secret().to_string(),
            ));
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(&email)?;
        let transport = self.transport()?;
        let recipient = self.config.recipient.clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Send(format!("send task failed: {e}")))?
            .map_err(|e| MailError::Send(e.to_string()))?;

        tracing::info!(to = %recipient, subject = %email.subject, "Contact email sent");
        Ok(())
    }
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address.parse().map_err(|e| MailError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            subject: "Workshop Booking Request".into(),
            html: "<p>hello</p>".into(),
        }
    }

    #[test]
    fn message_is_html_from_company_to_recipient() {
        let mailer = SmtpMailer::new(MailConfig::default(), "Mascotte.AI");
        let message = mailer.build_message(&email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("noreply@mascotte.com"));
        assert!(raw.contains("Mascotte.AI"));
        assert!(raw.contains("To: mao@reblika.com"));
        assert!(raw.contains("Subject: Workshop Booking Request"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let config = MailConfig {
            recipient: "not an address".into(),
            ..MailConfig::default()
        };
        let mailer = SmtpMailer::new(config, "Mascotte.AI");
        assert!(matches!(
            mailer.build_message(&email()),
            Err(MailError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn send_without_smtp_host_fails() {
        let mailer = SmtpMailer::new(MailConfig::default(), "Mascotte.AI");
        assert!(matches!(
            mailer.send(email()).await,
            Err(MailError::NotConfigured)
        ));
    }
}
