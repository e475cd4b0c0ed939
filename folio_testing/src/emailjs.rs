use std::{collections::HashMap, net::IpAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing, Json, Router};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;

pub const SEND_ROUTE: &str = "/api/v1.0/email/send";

/// An in-memory stand-in for the EmailJS send API.
#[derive(Debug, Clone)]
pub struct FakeEmailJs {
    service_id: Arc<str>,
    template_id: Arc<str>,
    public_key: Arc<str>,
    inbox: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeEmailJs {
    pub fn new(service_id: &str, template_id: &str, public_key: &str) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
            inbox: Default::default(),
        }
    }

    /// The template parameters of all accepted messages.
    pub async fn inbox(&self) -> Vec<HashMap<String, String>> {
        self.inbox.lock().await.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(SEND_ROUTE, routing::post(send))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the send endpoint.
    pub async fn spawn(&self) -> anyhow::Result<Url> {
        let addr = crate::spawn(self.router()).await?;
        Ok(format!("http://{addr}{SEND_ROUTE}").parse()?)
    }
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    service_id: String,
    template_id: String,
    public_key: String,
) -> anyhow::Result<()> {
    info!("Starting emailjs testing server on {host}:{port}");
    info!("EmailJS send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("Service id: {service_id:?}, template id: {template_id:?}, public key: {public_key:?}");

    let state = FakeEmailJs::new(&service_id, &template_id, &public_key);
    crate::serve(host, port, state.router()).await
}

#[derive(Deserialize)]
struct SendRequest {
    service_id: String,
    template_id: String,
    user_id: String,
    template_params: HashMap<String, String>,
}

async fn send(
    State(state): State<FakeEmailJs>,
    Json(request): Json<SendRequest>,
) -> (StatusCode, &'static str) {
    if *request.user_id != *state.public_key {
        return (StatusCode::BAD_REQUEST, "The Public Key is invalid");
    }
    if *request.service_id != *state.service_id {
        return (StatusCode::BAD_REQUEST, "The service ID is invalid");
    }
    if *request.template_id != *state.template_id {
        return (StatusCode::BAD_REQUEST, "The template ID is invalid");
    }

    state.inbox.lock().await.push(request.template_params);

    (StatusCode::OK, "OK")
}
