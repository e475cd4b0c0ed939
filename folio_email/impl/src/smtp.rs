use anyhow::anyhow;
use folio_email_contracts::{Email, EmailBody, EmailSendError};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header::ContentType, Mailbox, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::warn;

/// Port on which SMTP servers expect an implicit TLS connection.
const SMTPS_PORT: u16 = 465;

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl SmtpEmailService {
    /// Connect to `host:port`. Port 465 uses implicit TLS. Every other port
    /// upgrades via STARTTLS when the server offers it and stays plaintext
    /// otherwise.
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<SmtpCredentials>,
        from: EmailAddressWithName,
    ) -> anyhow::Result<Self> {
        let builder = if port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .tls(Tls::Opportunistic(TlsParameters::new(host.into())?))
        };

        let transport = builder
            .port(port)
            .apply_map(credentials, |builder, credentials| {
                builder.credentials(Credentials::new(credentials.username, credentials.password))
            })
            .build();

        Ok(Self {
            from: from.0,
            transport,
        })
    }

    pub async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        let message = build_message(self.from.clone(), email)?;

        let response = self.transport.send(message).await.map_err(|err| {
            warn!(error = %err, "SMTP server did not accept the message");
            EmailSendError::Delivery(err.to_string())
        })?;

        if !response.is_positive() {
            warn!(code = %response.code(), "SMTP server rejected the message");
            return Err(EmailSendError::Delivery(format!(
                "SMTP server responded with {}",
                response.code()
            )));
        }

        Ok(())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn build_message(from: Mailbox, email: Email) -> Result<Message, EmailSendError> {
    let builder = Message::builder()
        .from(from)
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    match email.body {
        EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text),
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))
        }
    }
    .map_err(|err| EmailSendError::Other(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from() -> Mailbox {
        "Portfolio Contact <relay@example.com>".parse().unwrap()
    }

    fn email(body: EmailBody) -> Email {
        Email {
            recipient: "owner@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Jane (jane@example.com)".into(),
            body,
            reply_to: Some("Jane <jane@example.com>".parse().unwrap()),
        }
    }

    #[test]
    fn alternative_body() {
        // Act
        let message = build_message(
            from(),
            email(EmailBody::Alternative {
                text: "plain body".into(),
                html: "<p>html body</p>".into(),
            }),
        )
        .unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("plain body"));
        assert!(formatted.contains("<p>html body</p>"));
        assert!(formatted.contains("Reply-To: "));
        assert!(formatted.contains("relay@example.com"));
        assert!(formatted.contains("owner@example.com"));
    }

    #[test]
    fn text_body_without_reply_to() {
        // Act
        let message = build_message(
            from(),
            Email {
                reply_to: None,
                ..email(EmailBody::Text("plain body".into()))
            },
        )
        .unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("text/plain"));
        assert!(!formatted.contains("Reply-To: "));
    }
}
