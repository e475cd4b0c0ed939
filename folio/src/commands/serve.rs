use folio_config::Config;
use folio_di::Provide;
use folio_email_contracts::EmailService;
use folio_utils::http::HttpClient;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Setting up email transport");
    let email = email::connect(&config.email, HttpClient::default())?;
    if email.is_configured() {
        if let Err(err) = email.ping().await {
            warn!("Email transport is not reachable: {err:#}");
        }
    }

    if config.contact.recipient.is_none() {
        warn!("No contact recipient configured, submissions will be rejected");
    }

    let config_provider = ConfigProvider::new(&config);
    let mut provider = Provider::new(config_provider, email);
    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
