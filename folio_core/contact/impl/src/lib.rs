use std::sync::Arc;

use anyhow::Context;
use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_di::Build;
use folio_email_contracts::{Email, EmailBody, EmailSendError, EmailService};
use folio_models::{
    contact::ContactSubmission,
    email_address::{EmailAddress, EmailAddressWithName},
};
use folio_templates_contracts::{
    ContactNotification, ContactNotificationHtml, ContactNotificationText, TemplateService,
};
use folio_utils::trace_instrument;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Build)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// The inbox receiving contact messages. `None` when not configured.
    pub recipient: Option<Arc<EmailAddress>>,
}

impl<EmailS, Template> ContactService for ContactServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    #[trace_instrument(skip(self))]
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let Some(recipient) = self.config.recipient.as_deref() else {
            error!("Cannot relay contact message: no recipient configured");
            return Err(ContactSendMessageError::NotConfigured);
        };

        let notification = ContactNotification {
            name: submission.name.to_string(),
            email: submission.email.to_string(),
            message: submission.message.to_string(),
        };

        let text = self
            .template
            .render(&ContactNotificationText(notification.clone()))
            .context("Failed to render text template")?;
        let html = self
            .template
            .render(&ContactNotificationHtml(notification))
            .context("Failed to render html template")?;

        let reply_to = match submission.email.parse::<EmailAddress>() {
            Ok(address) => Some(address.with_name(submission.name.to_string())),
            Err(err) => {
                warn!(email = %submission.email, %err, "Submitter address cannot be used as reply-to");
                None
            }
        };

        let email = Email {
            recipient: EmailAddressWithName::from(recipient.clone()),
            subject: subject(&submission),
            body: EmailBody::Alternative { text, html },
            reply_to,
        };

        match self.email.send(email).await {
            Ok(()) => {
                info!(name = %submission.name, email = %submission.email, "Relayed contact message");
                Ok(())
            }
            Err(EmailSendError::NotConfigured(missing)) => {
                error!(?missing, "Cannot relay contact message: email transport not configured");
                Err(ContactSendMessageError::NotConfigured)
            }
            Err(EmailSendError::Delivery(reason)) => {
                error!(%reason, "Email provider failed to deliver contact message");
                Err(ContactSendMessageError::Send)
            }
            Err(EmailSendError::Other(err)) => Err(err.into()),
        }
    }
}

fn subject(submission: &ContactSubmission) -> String {
    format!(
        "Portfolio Contact: {} ({})",
        *submission.name, *submission.email
    )
}
