use folio_client::{
    emailjs::EmailJsApiServiceImpl,
    transport::{DirectTransport, EmailJsCredentials, RelayTransport},
    ContactTransportImpl,
};
use folio_config::{ClientConfig, ClientTransport, EmailJsConfig};
use folio_utils::http::HttpClient;

/// Pick the client transport named by the configuration.
pub fn transport(config: &ClientConfig, client: HttpClient) -> ContactTransportImpl {
    match config.transport {
        ClientTransport::Relay => {
            ContactTransportImpl::Relay(RelayTransport::new(client, config.endpoint.clone()))
        }
        ClientTransport::Direct => ContactTransportImpl::Direct(DirectTransport::new(
            EmailJsApiServiceImpl::new(client, config.emailjs.endpoint_override.clone()),
            emailjs_credentials(&config.emailjs),
        )),
    }
}

pub fn emailjs_credentials(config: &EmailJsConfig) -> Option<EmailJsCredentials> {
    EmailJsCredentials::new(
        config.service_id.clone(),
        config.template_id.clone(),
        config.public_key.clone(),
    )
}
