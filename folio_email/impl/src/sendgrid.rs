use std::sync::Arc;

use folio_email_contracts::{Email, EmailBody, EmailSendError};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::http::HttpClient;
use lettre::message::Mailbox;
use serde::Serialize;
use tracing::warn;
use url::Url;

const SEND_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Delivers emails through the SendGrid v3 mail send API.
#[derive(Debug, Clone)]
pub struct SendGridEmailService {
    client: HttpClient,
    endpoint: Arc<Url>,
    api_key: Arc<str>,
    from: Mailbox,
}

impl SendGridEmailService {
    pub fn new(
        client: HttpClient,
        api_key: &str,
        from: EmailAddressWithName,
        endpoint_override: Option<Url>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint_override
                .unwrap_or_else(|| SEND_ENDPOINT.parse().unwrap())
                .into(),
            api_key: api_key.into(),
            from: from.0,
        }
    }

    pub async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        let (text, html) = match &email.body {
            EmailBody::Text(text) => (Some(text.as_str()), None),
            EmailBody::Alternative { text, html } => (Some(text.as_str()), Some(html.as_str())),
        };

        let request = SendRequest {
            personalizations: [Personalization {
                to: [Recipient::from(&email.recipient.0)],
            }],
            from: (&self.from).into(),
            reply_to: email.reply_to.as_ref().map(|x| (&x.0).into()),
            subject: &email.subject,
            content: text
                .map(|value| Content {
                    r#type: "text/plain",
                    value,
                })
                .into_iter()
                .chain(html.map(|value| Content {
                    r#type: "text/html",
                    value,
                }))
                .collect(),
        };

        let response = self
            .client
            .post((*self.endpoint).clone())
            .bearer_auth(&*self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "Failed to reach SendGrid");
                EmailSendError::Delivery(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "SendGrid rejected the message");
            return Err(EmailSendError::Delivery(format!(
                "SendGrid responded with {status}"
            )));
        }

        Ok(())
    }

    /// SendGrid offers no unauthenticated health endpoint, so the transport is
    /// considered reachable once it has been configured.
    pub async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Recipient<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Recipient<'a>>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Recipient<'a>; 1],
}

#[derive(Serialize)]
struct Recipient<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> From<&'a Mailbox> for Recipient<'a> {
    fn from(value: &'a Mailbox) -> Self {
        Self {
            email: value.email.as_ref(),
            name: value.name.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    r#type: &'static str,
    value: &'a str,
}
