use folio_config::{ClientTransport, Config};
use folio_utils::http::HttpClient;

use crate::{client, email};

/// Print which parts of the contact pipeline are ready to use.
pub fn check_config(config: &Config, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        println!("{config:#?}");
    }

    let email = email::connect(&config.email, HttpClient::default())?;
    match &email {
        folio_email_impl::EmailServiceImpl::Unconfigured { missing } => {
            println!("relay transport: not configured (missing {})", missing.join(", "))
        }
        _ => println!("relay transport: {}", email.provider_name()),
    }

    match &config.contact.recipient {
        Some(recipient) => println!("relay recipient: {recipient}"),
        None => println!("relay recipient: not configured (missing contact.recipient)"),
    }

    match config.client.transport {
        ClientTransport::Relay => println!("client transport: relay ({})", config.client.endpoint),
        ClientTransport::Direct => match client::emailjs_credentials(&config.client.emailjs) {
            Some(_) => println!("client transport: emailjs"),
            None => println!("client transport: emailjs (not configured)"),
        },
    }

    Ok(())
}
