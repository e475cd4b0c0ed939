use std::{future::Future, sync::Arc};

use anyhow::Context;
use folio_models::contact::ContactSubmission;
use folio_utils::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::{
    emailjs::{EmailJsApiService, EmailJsApiServiceImpl, EmailJsTemplateParams},
    DispatchError,
};

/// Error text used when the relay rejects a submission without saying why.
const RELAY_FALLBACK_ERROR: &str = "Failed to send message";

/// A way of getting a validated submission to the site owner.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactTransport: Send + Sync + 'static {
    fn deliver(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

#[cfg(any(test, feature = "mock"))]
impl MockContactTransport {
    pub fn with_deliver(
        mut self,
        submission: ContactSubmission,
        result: Result<(), DispatchError>,
    ) -> Self {
        self.expect_deliver()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

/// The transport selected once from the client configuration.
#[derive(Debug, Clone)]
pub enum ContactTransportImpl {
    Relay(RelayTransport),
    Direct(DirectTransport<EmailJsApiServiceImpl>),
}

impl ContactTransport for ContactTransportImpl {
    async fn deliver(&self, submission: ContactSubmission) -> Result<(), DispatchError> {
        match self {
            Self::Relay(relay) => relay.deliver(submission).await,
            Self::Direct(direct) => direct.deliver(submission).await,
        }
    }
}

/// Posts submissions as JSON to the contact relay.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: HttpClient,
    endpoint: Arc<Url>,
}

impl RelayTransport {
    pub fn new(client: HttpClient, endpoint: Url) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct RelayErrorResponse {
    error: Option<String>,
}

impl ContactTransport for RelayTransport {
    async fn deliver(&self, submission: ContactSubmission) -> Result<(), DispatchError> {
        let response = self
            .client
            .post((*self.endpoint).clone())
            .json(&RelayRequest {
                name: &submission.name,
                email: &submission.email,
                message: &submission.message,
            })
            .send()
            .await
            .context("Failed to reach the contact relay")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error = response
            .json::<RelayErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| RELAY_FALLBACK_ERROR.into());
        warn!(%status, %error, "Contact relay rejected the submission");

        Err(DispatchError::Rejected(error))
    }
}

/// Sends submissions straight from the browser through EmailJS.
#[derive(Debug, Clone)]
pub struct DirectTransport<Api> {
    api: Api,
    credentials: Option<Arc<EmailJsCredentials>>,
}

/// All three values are required; a partially configured account counts as
/// not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl EmailJsCredentials {
    pub fn new(
        service_id: Option<String>,
        template_id: Option<String>,
        public_key: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            service_id: service_id?,
            template_id: template_id?,
            public_key: public_key?,
        })
    }
}

impl<Api> DirectTransport<Api> {
    pub fn new(api: Api, credentials: Option<EmailJsCredentials>) -> Self {
        Self {
            api,
            credentials: credentials.map(Arc::new),
        }
    }
}

impl<Api: EmailJsApiService> ContactTransport for DirectTransport<Api> {
    async fn deliver(&self, submission: ContactSubmission) -> Result<(), DispatchError> {
        let Some(credentials) = self.credentials.as_deref() else {
            return Err(DispatchError::NotConfigured);
        };

        let params = EmailJsTemplateParams {
            from_name: submission.name.to_string(),
            from_email: submission.email.to_string(),
            message: submission.message.to_string(),
        };

        self.api
            .send(credentials.clone(), params)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;
    use crate::emailjs::MockEmailJsApiService;

    const MESSAGE: &str = "Hello, I'd like to discuss a project with you.";

    fn submission() -> ContactSubmission {
        ContactSubmission::validate("Jane Doe", "jane@example.com", MESSAGE).unwrap()
    }

    fn credentials() -> EmailJsCredentials {
        EmailJsCredentials {
            service_id: "service".into(),
            template_id: "template".into(),
            public_key: "public".into(),
        }
    }

    #[test]
    fn partial_credentials() {
        assert_eq!(
            EmailJsCredentials::new(Some("service".into()), None, Some("public".into())),
            None
        );
        assert_eq!(
            EmailJsCredentials::new(
                Some("service".into()),
                Some("template".into()),
                Some("public".into())
            ),
            Some(credentials())
        );
    }

    #[tokio::test]
    async fn direct_ok() {
        // Arrange
        let api = MockEmailJsApiService::new().with_send(
            credentials(),
            EmailJsTemplateParams {
                from_name: "Jane Doe".into(),
                from_email: "jane@example.com".into(),
                message: MESSAGE.into(),
            },
            Ok(()),
        );
        let sut = DirectTransport::new(api, Some(credentials()));

        // Act
        let result = sut.deliver(submission()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn direct_not_configured() {
        // Arrange
        let sut = DirectTransport::new(MockEmailJsApiService::new(), None);

        // Act
        let result = sut.deliver(submission()).await;

        // Assert
        assert_matches!(result, Err(DispatchError::NotConfigured));
    }

    #[tokio::test]
    async fn direct_provider_error() {
        // Arrange
        let api = MockEmailJsApiService::new().with_send(
            credentials(),
            EmailJsTemplateParams {
                from_name: "Jane Doe".into(),
                from_email: "jane@example.com".into(),
                message: MESSAGE.into(),
            },
            Err(anyhow::anyhow!("The template ID is invalid")),
        );
        let sut = DirectTransport::new(api, Some(credentials()));

        // Act
        let result = sut.deliver(submission()).await;

        // Assert
        assert_matches!(&result, Err(DispatchError::Other(_)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to send message. Please try again or contact me directly."
        );
    }
}
