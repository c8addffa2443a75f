//! Email notifications over SMTP
//!
//! Builds the transport from stored settings at send time so settings edits
//! take effect without a restart. Incomplete settings fail closed with a
//! descriptive error.

use aiops_core::domain::settings::SmtpSettings;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::error::NotifyError;

/// SMTP-backed email notifier
pub struct EmailNotifier {
    smtp: Option<SmtpSettings>,
    recipient: Option<String>,
}

impl EmailNotifier {
    pub fn new(smtp: Option<SmtpSettings>, recipient: Option<String>) -> Self {
        Self {
            smtp,
            recipient: recipient.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Sends an HTML email to the configured recipient
    pub async fn send(&self, subject: &str, html_body: &str) -> Result<String, NotifyError> {
        let smtp = self
            .smtp
            .as_ref()
            .ok_or(NotifyError::IncompleteSmtpSettings)?;
        let recipient = self
            .recipient
            .as_deref()
            .ok_or(NotifyError::MissingRecipient)?;

        let message = Message::builder()
            .from(
                smtp.sender
                    .parse()
                    .map_err(|e| NotifyError::Send(format!("invalid sender address: {}", e)))?,
            )
            .to(recipient
                .parse()
                .map_err(|e| NotifyError::Send(format!("invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        let transport = build_transport(smtp)?;
        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        info!("Sent email notification to {}", recipient);
        Ok("Email sent".to_string())
    }
}

fn build_transport(
    smtp: &SmtpSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
    let credentials = Credentials::new(smtp.username.clone(), smtp.password.clone());

    let builder = if smtp.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)
            .map_err(|e| NotifyError::Send(e.to_string()))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.server)
    };

    Ok(builder.port(smtp.port).credentials(credentials).build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp() -> SmtpSettings {
        SmtpSettings {
            server: "mail.example.com".to_string(),
            port: 587,
            username: "ops".to_string(),
            password: "hunter2".to_string(),
            sender: "aiops@example.com".to_string(),
            use_tls: true,
        }
    }

    #[tokio::test]
    async fn test_incomplete_settings_fail_closed() {
        let notifier = EmailNotifier::new(None, Some("ops@example.com".to_string()));
        let err = notifier.send("subject", "<p>body</p>").await.unwrap_err();
        assert!(matches!(err, NotifyError::IncompleteSmtpSettings));
    }

    #[tokio::test]
    async fn test_missing_recipient_fails_closed() {
        let notifier = EmailNotifier::new(Some(smtp()), None);
        let err = notifier.send("subject", "<p>body</p>").await.unwrap_err();
        assert!(matches!(err, NotifyError::MissingRecipient));
    }

    #[tokio::test]
    async fn test_invalid_sender_is_reported() {
        let mut settings = smtp();
        settings.sender = "not an address".to_string();
        let notifier = EmailNotifier::new(Some(settings), Some("ops@example.com".to_string()));
        let err = notifier.send("subject", "<p>body</p>").await.unwrap_err();
        assert!(err.to_string().contains("invalid sender address"));
    }

    #[tokio::test]
    async fn test_transport_builds_for_both_tls_modes() {
        assert!(build_transport(&smtp()).is_ok());
        let mut plain = smtp();
        plain.use_tls = false;
        assert!(build_transport(&plain).is_ok());
    }
}
