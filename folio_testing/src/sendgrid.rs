use std::{net::IpAddr, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing, Json, Router,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;

pub const SEND_ROUTE: &str = "/v3/mail/send";

/// An in-memory stand-in for the SendGrid mail send API.
#[derive(Debug, Clone)]
pub struct FakeSendGrid {
    api_key: Arc<str>,
    unavailable: bool,
    inbox: Arc<Mutex<Vec<Value>>>,
}

impl FakeSendGrid {
    pub fn new(api_key: impl Into<Arc<str>>) -> Self {
        Self {
            api_key: api_key.into(),
            unavailable: false,
            inbox: Default::default(),
        }
    }

    /// Answer every request with `503 Service Unavailable`.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// The request bodies of all accepted messages.
    pub async fn inbox(&self) -> Vec<Value> {
        self.inbox.lock().await.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(SEND_ROUTE, routing::post(send))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the mail send endpoint.
    pub async fn spawn(&self) -> anyhow::Result<Url> {
        let addr = crate::spawn(self.router()).await?;
        Ok(format!("http://{addr}{SEND_ROUTE}").parse()?)
    }
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting sendgrid testing server on {host}:{port}");
    info!("SendGrid mail send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("API key: {api_key:?}");

    crate::serve(host, port, FakeSendGrid::new(api_key).router()).await
}

async fn send(
    State(state): State<FakeSendGrid>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if state.unavailable {
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    let expected = format!("Bearer {}", state.api_key);
    if headers.get(header::AUTHORIZATION).map(|x| x.as_bytes()) != Some(expected.as_bytes()) {
        return StatusCode::UNAUTHORIZED;
    }

    info!(
        to = %body["personalizations"][0]["to"][0]["email"],
        subject = %body["subject"],
        "Accepted message"
    );
    state.inbox.lock().await.push(body);

    StatusCode::ACCEPTED
}
