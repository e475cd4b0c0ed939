use folio_config::{EmailConfig, EmailProvider};
use folio_email_impl::{
    smtp::SmtpCredentials, EmailServiceImpl, SendGridEmailService, SmtpEmailService,
};
use folio_utils::http::HttpClient;
use tracing::{info, warn};

/// Set up the configured email transport.
///
/// Missing credentials or addresses do not fail startup; the returned transport
/// then rejects every message as not configured.
pub fn connect(config: &EmailConfig, client: HttpClient) -> anyhow::Result<EmailServiceImpl> {
    let mut missing = Vec::new();

    if config.from.is_none() {
        missing.push("email.from");
    }

    let email = match config.provider {
        EmailProvider::Smtp => {
            let smtp = &config.smtp;
            for (key, value) in [
                ("email.smtp.host", &smtp.host),
                ("email.smtp.username", &smtp.username),
                ("email.smtp.password", &smtp.password),
            ] {
                if value.is_none() {
                    missing.push(key);
                }
            }

            match (&config.from, &smtp.host, &smtp.username, &smtp.password) {
                (Some(from), Some(host), Some(username), Some(password)) => {
                    info!(%host, port = smtp.port, "Using SMTP email transport");
                    EmailServiceImpl::Smtp(SmtpEmailService::new(
                        host,
                        smtp.port,
                        Some(SmtpCredentials {
                            username: username.clone(),
                            password: password.clone(),
                        }),
                        from.clone().with_name(&config.from_name),
                    )?)
                }
                _ => EmailServiceImpl::unconfigured(missing),
            }
        }
        EmailProvider::SendGrid => {
            let sendgrid = &config.sendgrid;
            if sendgrid.api_key.is_none() {
                missing.push("email.sendgrid.api_key");
            }

            match (&config.from, &sendgrid.api_key) {
                (Some(from), Some(api_key)) => {
                    info!("Using SendGrid email transport");
                    EmailServiceImpl::SendGrid(SendGridEmailService::new(
                        client,
                        api_key,
                        from.clone().with_name(&config.from_name),
                        sendgrid.endpoint_override.clone(),
                    ))
                }
                _ => EmailServiceImpl::unconfigured(missing),
            }
        }
    };

    if let EmailServiceImpl::Unconfigured { missing } = &email {
        warn!(?missing, "Email transport is not configured");
    }

    Ok(email)
}
