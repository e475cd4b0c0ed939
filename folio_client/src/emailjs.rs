use std::{future::Future, sync::Arc};

use anyhow::{anyhow, Context};
use folio_utils::http::HttpClient;
use serde::Serialize;
use url::Url;

use crate::transport::EmailJsCredentials;

const SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait EmailJsApiService: Send + Sync + 'static {
    /// Send an email through the EmailJS template identified by `credentials`.
    fn send(
        &self,
        credentials: EmailJsCredentials,
        params: EmailJsTemplateParams,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(any(test, feature = "mock"))]
impl MockEmailJsApiService {
    pub fn with_send(
        mut self,
        credentials: EmailJsCredentials,
        params: EmailJsTemplateParams,
        result: anyhow::Result<()>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(
                mockall::predicate::eq(credentials),
                mockall::predicate::eq(params),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}

/// Variables available to the EmailJS template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailJsTemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct EmailJsApiServiceImpl {
    client: HttpClient,
    endpoint: Arc<Url>,
}

impl EmailJsApiServiceImpl {
    pub fn new(client: HttpClient, endpoint_override: Option<Url>) -> Self {
        Self {
            client,
            endpoint: endpoint_override
                .unwrap_or_else(|| SEND_ENDPOINT.parse().unwrap())
                .into(),
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailJsTemplateParams,
}

impl EmailJsApiService for EmailJsApiServiceImpl {
    async fn send(
        &self,
        credentials: EmailJsCredentials,
        params: EmailJsTemplateParams,
    ) -> anyhow::Result<()> {
        let response = self
            .client
            .post((*self.endpoint).clone())
            .json(&SendRequest {
                service_id: &credentials.service_id,
                template_id: &credentials.template_id,
                user_id: &credentials.public_key,
                template_params: &params,
            })
            .send()
            .await
            .context("Failed to reach EmailJS")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("EmailJS responded with {status}: {text}"));
        }

        Ok(())
    }
}
