use folio_email_contracts::{Email, EmailSendError, EmailService};

pub use self::{sendgrid::SendGridEmailService, smtp::SmtpEmailService};

pub mod sendgrid;
pub mod smtp;

/// The email transport selected at startup.
///
/// When required settings are missing the relay still starts, but every send
/// fails with [`EmailSendError::NotConfigured`] without touching the network.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Smtp(SmtpEmailService),
    SendGrid(SendGridEmailService),
    Unconfigured { missing: Vec<&'static str> },
}

impl EmailServiceImpl {
    pub fn unconfigured(missing: Vec<&'static str>) -> Self {
        Self::Unconfigured { missing }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured { .. })
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::SendGrid(_) => "sendgrid",
            Self::Unconfigured { .. } => "unconfigured",
        }
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        match self {
            Self::Smtp(smtp) => smtp.send(email).await,
            Self::SendGrid(sendgrid) => sendgrid.send(email).await,
            Self::Unconfigured { missing } => Err(EmailSendError::NotConfigured(missing.clone())),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Smtp(smtp) => smtp.ping().await,
            Self::SendGrid(sendgrid) => sendgrid.ping().await,
            Self::Unconfigured { missing } => Err(anyhow::anyhow!(
                "Email transport is not configured (missing {})",
                missing.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::EmailBody;
    use folio_utils::assert_matches;

    use super::*;

    #[tokio::test]
    async fn unconfigured_send_fails_without_network() {
        // Arrange
        let sut = EmailServiceImpl::unconfigured(vec!["email.from", "email.sendgrid.api_key"]);
        let email = Email {
            recipient: "owner@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Jane (jane@example.com)".into(),
            body: EmailBody::Text("Hello there, this is a test.".into()),
            reply_to: None,
        };

        // Act
        let result = sut.send(email).await;

        // Assert
        assert_matches!(result, Err(EmailSendError::NotConfigured(missing)) if missing == &["email.from", "email.sendgrid.api_key"]);
        assert!(!sut.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_ping_fails() {
        let sut = EmailServiceImpl::unconfigured(vec!["email.smtp.host"]);
        let err = sut.ping().await.unwrap_err();
        assert!(err.to_string().contains("email.smtp.host"));
    }
}
